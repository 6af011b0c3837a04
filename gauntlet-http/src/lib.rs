//! HTTP request execution for Gauntlet
//!
//! This crate turns request templates into immutable [`RequestSpec`]s and
//! executes them with a per-request deadline, classifying every result into
//! an [`gauntlet_core::Outcome`] instead of an error.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{classify_error, RequestExecutor, ReqwestExecutor};
pub use config::HttpClientConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpMethodError, RequestSpec};
