//! Request templates

use crate::errors::HttpError;
use bytes::Bytes;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// HTTP methods a scenario may use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(HttpMethodError::InvalidMethod(s.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum HttpMethodError {
    #[error("Invalid HTTP method: '{0}'. Supported methods are: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS")]
    InvalidMethod(String),
}

/// Immutable description of one HTTP call.
///
/// Built once per (scenario, framework) pairing and shared read-only by every
/// worker of a run. All validation happens here, so executing a spec never
/// fails for reasons of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: HttpMethod,
    url: Url,
    body: Option<Bytes>,
    content_type: Option<HeaderValue>,
}

impl RequestSpec {
    /// Spec without a body. The URL must be absolute http(s) with a host.
    pub fn new(method: HttpMethod, url: &str) -> Result<Self, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                url
            )));
        }
        if url.host_str().is_none() {
            return Err(HttpError::InvalidUrl(format!("{}: missing host", url)));
        }

        Ok(Self {
            method,
            url,
            body: None,
            content_type: None,
        })
    }

    /// Join a base address and an absolute path, keeping any path prefix of the base
    pub fn from_base(method: HttpMethod, base_url: &str, path: &str) -> Result<Self, HttpError> {
        if !path.starts_with('/') {
            return Err(HttpError::InvalidUrl(format!(
                "path '{}' must start with '/'",
                path
            )));
        }
        Self::new(method, &format!("{}{}", base_url.trim_end_matches('/'), path))
    }

    /// Attach a raw body with the given content type
    pub fn with_body(
        mut self,
        body: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<Self, HttpError> {
        let header = HeaderValue::from_str(content_type).map_err(|_| {
            HttpError::InvalidHeaderValue {
                name: "content-type".to_string(),
                value: content_type.to_string(),
            }
        })?;
        self.body = Some(body.into());
        self.content_type = Some(header);
        Ok(self)
    }

    /// Attach a JSON body serialized once up front
    pub fn with_json(self, value: &serde_json::Value) -> Result<Self, HttpError> {
        let body = serde_json::to_vec(value)?;
        self.with_body(body, "application/json")
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Cheap to clone; shares the underlying buffer
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
