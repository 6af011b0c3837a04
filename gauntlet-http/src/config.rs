//! HTTP client configuration

use gauntlet_config::HttpConfig as ConfigHttpConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings the benchmarking client is built with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum number of redirects to follow; 0 reports 3xx as-is
    pub max_redirects: u32,

    /// Keep-alive connections retained per host
    pub pool_max_idle_per_host: usize,

    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        ConfigHttpConfig::default().into()
    }
}

impl From<ConfigHttpConfig> for HttpClientConfig {
    fn from(config: ConfigHttpConfig) -> Self {
        Self {
            user_agent: config.user_agent,
            max_redirects: config.max_redirects,
            pool_max_idle_per_host: config.connection_pool.max_idle_per_host,
            connect_timeout: config.connection_pool.connect_timeout,
        }
    }
}

impl From<&ConfigHttpConfig> for HttpClientConfig {
    fn from(config: &ConfigHttpConfig) -> Self {
        config.clone().into()
    }
}
