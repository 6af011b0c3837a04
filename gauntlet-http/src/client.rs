//! Timed request execution

use crate::config::HttpClientConfig;
use crate::errors::HttpError;
use crate::types::RequestSpec;
use gauntlet_core::{FailureKind, Outcome};
use reqwest::{header::CONTENT_TYPE, redirect, Client};
use std::error::Error as StdError;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Issues one HTTP request and reports what happened.
///
/// Implementations never return an error for a failed request: refused
/// connections, timeouts, broken transports and non-2xx statuses are all
/// classified outcomes. Implementations must not retry.
#[async_trait::async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec, timeout: Duration) -> Outcome;
}

/// `RequestExecutor` backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HTTP client (pool {} per host, connect timeout {:?})",
            config.pool_max_idle_per_host, config.connect_timeout
        );

        let redirect_policy = if config.max_redirects == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(config.max_redirects as usize)
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(redirect_policy)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(HttpError::ClientBuild)?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn send(&self, spec: &RequestSpec, timeout: Duration) -> Result<u16, reqwest::Error> {
        let mut request = self
            .client
            .request(spec.method().into(), spec.url().clone())
            .timeout(timeout);

        if let Some(body) = spec.body() {
            request = request.body(body.clone());
        }
        if let Some(content_type) = spec.content_type() {
            request = request.header(CONTENT_TYPE, content_type.clone());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        // Latency covers the full body, not just the headers
        response.bytes().await?;
        Ok(status)
    }
}

#[async_trait::async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, spec: &RequestSpec, timeout: Duration) -> Outcome {
        let start = Instant::now();
        let result = self.send(spec, timeout).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(status) => Outcome::from_status(elapsed, status),
            Err(err) => {
                let kind = classify_error(&err);
                trace!("{} failed as {}: {}", spec, kind, err);
                Outcome::failed(elapsed, kind)
            }
        };

        trace!("{} -> {:?} in {:?}", spec, outcome.status(), elapsed);
        outcome
    }
}

/// Map a transport-level reqwest error to exactly one failure kind
pub fn classify_error(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() && is_connection_refused(err) {
        FailureKind::ConnectionRefused
    } else {
        FailureKind::Transport
    }
}

fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = current.source();
    }
    false
}
