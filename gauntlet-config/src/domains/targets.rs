//! Frameworks under test and the scenarios run against them

use crate::error::ConfigResult;
use crate::validation::{
    validate_enum_choice, validate_http_url, validate_path, validate_required_string, Validatable,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

const SUPPORTED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// A running HTTP server to benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkConfig {
    pub name: String,

    /// Base address, e.g. `http://127.0.0.1:8080`
    pub base_url: String,

    /// Skip flag; disabled frameworks are left out of the comparison
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,
}

impl FrameworkConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            enabled: true,
        }
    }
}

impl Validatable for FrameworkConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;
        validate_http_url(&self.base_url, "base_url", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "frameworks"
    }
}

/// A named request template, with per-framework route overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,

    #[serde(default = "default_method")]
    pub method: String,

    /// Path used for every framework without an override
    pub path: String,

    /// Framework name -> path, for frameworks with different route conventions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: BTreeMap<String, String>,

    /// JSON request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,

    /// Content-Type header; defaults to application/json when a body is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ScenarioConfig {
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: "GET".to_string(),
            path: path.into(),
            routes: BTreeMap::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn post_json(name: impl Into<String>, path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            name: name.into(),
            method: "POST".to_string(),
            path: path.into(),
            routes: BTreeMap::new(),
            body: Some(body),
            content_type: Some("application/json".to_string()),
        }
    }

    pub fn with_route(mut self, framework: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(framework.into(), path.into());
        self
    }

    /// Path to request on the given framework
    pub fn path_for(&self, framework: &str) -> &str {
        self.routes
            .get(framework)
            .map(String::as_str)
            .unwrap_or(self.path.as_str())
    }
}

impl Validatable for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;
        validate_enum_choice(&self.method, &SUPPORTED_METHODS, "method", self.domain_name())?;
        validate_path(&self.path, "path", self.domain_name())?;

        for (framework, path) in &self.routes {
            validate_path(path, &format!("routes.{}", framework), self.domain_name())?;
        }

        if let Some(ref content_type) = self.content_type {
            validate_required_string(content_type, "content_type", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios"
    }
}

fn default_method() -> String {
    "GET".to_string()
}

/// The two servers compared by default
pub fn default_frameworks() -> Vec<FrameworkConfig> {
    vec![
        FrameworkConfig::new("RustAPI", "http://127.0.0.1:8080"),
        FrameworkConfig::new("Actix-web", "http://127.0.0.1:8081"),
    ]
}

/// Plain text, JSON, path parameter, JSON list and JSON POST endpoints
pub fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig::get("Plain Text", "/"),
        ScenarioConfig::get("JSON", "/json"),
        ScenarioConfig::get("Path Parameter", "/users/1"),
        ScenarioConfig::get("JSON List", "/users-list").with_route("Actix-web", "/users"),
        ScenarioConfig::post_json(
            "POST JSON",
            "/create-user",
            serde_json::json!({
                "name": "Bench User",
                "email": "bench@example.com"
            }),
        )
        .with_route("Actix-web", "/users"),
    ]
}
