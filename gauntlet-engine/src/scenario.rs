//! Scenarios and the frameworks they run against

use gauntlet_config::{FrameworkConfig, ScenarioConfig};
use gauntlet_core::SetupError;
use gauntlet_http::{HttpMethod, RequestSpec};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A running server under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    pub name: String,
    pub base_url: String,
}

impl Framework {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

impl From<&FrameworkConfig> for Framework {
    fn from(config: &FrameworkConfig) -> Self {
        Self::new(config.name.clone(), config.base_url.clone())
    }
}

/// Named request template with per-framework path substitution
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub method: HttpMethod,
    path: String,
    routes: BTreeMap<String, String>,
    body: Option<JsonValue>,
    content_type: Option<String>,
}

impl Scenario {
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Get,
            path: path.into(),
            routes: BTreeMap::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn post_json(name: impl Into<String>, path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::get(name, path)
        }
    }

    pub fn with_route(mut self, framework: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(framework.into(), path.into());
        self
    }

    pub fn path_for(&self, framework: &str) -> &str {
        self.routes
            .get(framework)
            .map(String::as_str)
            .unwrap_or(self.path.as_str())
    }

    /// Build the immutable request for one framework.
    ///
    /// Every malformed template surfaces here, before any request is issued.
    pub fn request_for(&self, framework: &Framework) -> Result<Arc<RequestSpec>, SetupError> {
        let path = self.path_for(&framework.name);
        let mut spec = RequestSpec::from_base(self.method, &framework.base_url, path)?;

        if let Some(body) = &self.body {
            spec = match &self.content_type {
                Some(content_type) => {
                    let bytes = serde_json::to_vec(body)
                        .map_err(|e| SetupError::InvalidRequest(e.to_string()))?;
                    spec.with_body(bytes, content_type)?
                }
                None => spec.with_json(body)?,
            };
        }

        Ok(Arc::new(spec))
    }
}

impl TryFrom<&ScenarioConfig> for Scenario {
    type Error = SetupError;

    fn try_from(config: &ScenarioConfig) -> Result<Self, Self::Error> {
        let method: HttpMethod = config.method.parse().map_err(|e| {
            SetupError::InvalidRequest(format!("scenario '{}': {}", config.name, e))
        })?;

        Ok(Self {
            name: config.name.clone(),
            method,
            path: config.path.clone(),
            routes: config.routes.clone(),
            body: config.body.clone(),
            content_type: config.content_type.clone(),
        })
    }
}
