//! Load generation configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How much load each (scenario, framework) run generates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Total requests per run
    #[serde(default = "default_requests")]
    pub requests: u64,

    /// Maximum requests in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout
    #[serde(
        rename = "request_timeout_ms",
        with = "crate::domains::utils::serde_millis",
        default = "default_request_timeout"
    )]
    pub request_timeout: Duration,

    /// Smoke-test mode: the quick_* values replace the default counts
    pub quick: bool,

    #[serde(default = "default_quick_requests")]
    pub quick_requests: u64,

    #[serde(default = "default_quick_concurrency")]
    pub quick_concurrency: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            requests: default_requests(),
            concurrency: default_concurrency(),
            request_timeout: default_request_timeout(),
            quick: false,
            quick_requests: default_quick_requests(),
            quick_concurrency: default_quick_concurrency(),
        }
    }
}

impl LoadConfig {
    /// Explicit request count from an override; also wins in quick mode
    pub fn set_requests(&mut self, requests: u64) {
        self.requests = requests;
        self.quick_requests = requests;
    }

    /// Explicit concurrency from an override; also wins in quick mode
    pub fn set_concurrency(&mut self, concurrency: usize) {
        self.concurrency = concurrency;
        self.quick_concurrency = concurrency;
    }

    /// Request count after applying quick mode
    pub fn effective_requests(&self) -> u64 {
        if self.quick {
            self.quick_requests
        } else {
            self.requests
        }
    }

    /// Concurrency after applying quick mode
    pub fn effective_concurrency(&self) -> usize {
        if self.quick {
            self.quick_concurrency
        } else {
            self.concurrency
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.requests, "requests", self.domain_name())?;
        validate_positive(self.concurrency, "concurrency", self.domain_name())?;
        validate_positive(
            self.request_timeout.as_millis(),
            "request_timeout_ms",
            self.domain_name(),
        )?;
        validate_positive(self.quick_requests, "quick_requests", self.domain_name())?;
        validate_positive(
            self.quick_concurrency,
            "quick_concurrency",
            self.domain_name(),
        )?;

        if self.effective_concurrency() as u64 > self.effective_requests() {
            log::warn!(
                "concurrency {} exceeds request count {}; parallelism will be capped",
                self.effective_concurrency(),
                self.effective_requests()
            );
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

// Default value functions
fn default_requests() -> u64 {
    10_000
}

fn default_concurrency() -> usize {
    50
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_quick_requests() -> u64 {
    1_000
}

fn default_quick_concurrency() -> usize {
    10
}
