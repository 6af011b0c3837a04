//! HTTP client settings shared by probes and load runs

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Redirects followed per request; 0 reports 3xx responses as-is
    pub max_redirects: u32,

    pub connection_pool: ConnectionPoolConfig,
}

/// Keep-alive pool sizing; one idle slot per in-flight request avoids reconnects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPoolConfig {
    pub max_idle_per_host: usize,

    #[serde(rename = "connect_timeout_ms", with = "crate::domains::utils::serde_millis")]
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("gauntlet/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 0,
            connection_pool: ConnectionPoolConfig::default(),
        }
    }
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 512,
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        let pool = &self.connection_pool;
        validate_positive(pool.max_idle_per_host, "connection_pool.max_idle_per_host", self.domain_name())?;
        validate_positive(
            pool.connect_timeout.as_millis(),
            "connection_pool.connect_timeout_ms",
            self.domain_name(),
        )
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}
