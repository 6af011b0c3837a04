//! HTTP error types

use crate::types::HttpMethodError;
use gauntlet_core::SetupError;

/// Errors raised while building request specs or the client.
///
/// Failures of an executed request never use this type; they become
/// classified outcomes.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl From<HttpError> for SetupError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ClientBuild(_) => SetupError::Client(err.to_string()),
            other => SetupError::InvalidRequest(other.to_string()),
        }
    }
}
