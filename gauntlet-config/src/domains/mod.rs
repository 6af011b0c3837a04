//! Domain-specific configuration modules

pub mod http;
pub mod load;
pub mod logging;
pub mod probe;
pub mod targets;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::{invalid, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Main Gauntlet configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GauntletConfig {
    /// Load generation configuration
    #[serde(default)]
    pub load: load::LoadConfig,

    /// Readiness probe configuration
    #[serde(default)]
    pub probe: probe::ProbeConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Servers under comparison
    #[serde(default = "targets::default_frameworks")]
    pub frameworks: Vec<targets::FrameworkConfig>,

    /// Request templates run against every framework
    #[serde(default = "targets::default_scenarios")]
    pub scenarios: Vec<targets::ScenarioConfig>,
}

impl Default for GauntletConfig {
    fn default() -> Self {
        Self {
            load: load::LoadConfig::default(),
            probe: probe::ProbeConfig::default(),
            http: http::HttpConfig::default(),
            logging: logging::LoggingConfig::default(),
            frameworks: targets::default_frameworks(),
            scenarios: targets::default_scenarios(),
        }
    }
}

impl GauntletConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.load.validate()?;
        self.probe.validate()?;
        self.http.validate()?;
        self.logging.validate()?;

        let mut framework_names = HashSet::new();
        for framework in &self.frameworks {
            framework.validate()?;
            if !framework_names.insert(framework.name.as_str()) {
                return Err(invalid(
                    "frameworks",
                    format!("duplicate framework name '{}'", framework.name),
                ));
            }
        }

        let mut scenario_names = HashSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !scenario_names.insert(scenario.name.as_str()) {
                return Err(invalid(
                    "scenarios",
                    format!("duplicate scenario name '{}'", scenario.name),
                ));
            }
            // Route overrides must point at a configured framework
            for framework in scenario.routes.keys() {
                if !framework_names.contains(framework.as_str()) {
                    return Err(invalid(
                        "scenarios",
                        format!(
                            "scenario '{}' overrides the route of unknown framework '{}'",
                            scenario.name, framework
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Disable every framework whose name matches one of `names` (case-insensitive)
    pub fn apply_skip<S: AsRef<str>>(&mut self, names: &[S]) -> ConfigResult<()> {
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let framework = self
                .frameworks
                .iter_mut()
                .find(|f| f.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    invalid("frameworks", format!("cannot skip unknown framework '{}'", name))
                })?;
            log::info!("Skipping framework {}", framework.name);
            framework.enabled = false;
        }
        Ok(())
    }

    pub fn enabled_frameworks(&self) -> impl Iterator<Item = &targets::FrameworkConfig> {
        self.frameworks.iter().filter(|f| f.enabled)
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = GauntletConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
