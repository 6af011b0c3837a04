//! Comparison runner

use crate::report::ComparisonReport;
use crate::scenario::{Framework, Scenario};
use crate::session::{run_config_from, BenchmarkSession};
use gauntlet_config::GauntletConfig;
use gauntlet_core::{BenchError, SetupError};
use gauntlet_http::RequestExecutor;
use gauntlet_resilience::ShutdownListener;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs every scenario against every framework, one session at a time
pub struct ComparisonRunner {
    session: BenchmarkSession,
    scenarios: Vec<Scenario>,
    frameworks: Vec<Framework>,
    shutdown: ShutdownListener,
}

impl ComparisonRunner {
    pub fn new(session: BenchmarkSession, scenarios: Vec<Scenario>, frameworks: Vec<Framework>) -> Self {
        Self {
            session,
            scenarios,
            frameworks,
            shutdown: ShutdownListener::never(),
        }
    }

    /// Enabled frameworks and all configured scenarios
    pub fn from_config(
        config: &GauntletConfig,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self, SetupError> {
        let scenarios = config
            .scenarios
            .iter()
            .map(Scenario::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let frameworks = config.enabled_frameworks().map(Framework::from).collect();
        let session = BenchmarkSession::new(executor, run_config_from(&config.load), &config.probe);

        Ok(Self::new(session, scenarios, frameworks))
    }

    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.session = self.session.with_shutdown(listener.clone());
        self.shutdown = listener;
        self
    }

    /// Keep only the named scenarios (case-insensitive), in their configured order
    pub fn retain_scenarios<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, SetupError> {
        if names.is_empty() {
            return Ok(self);
        }
        for name in names {
            let name = name.as_ref();
            if !self.scenarios.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
                return Err(SetupError::InvalidRunConfig(format!("unknown scenario '{}'", name)));
            }
        }
        self.scenarios
            .retain(|s| names.iter().any(|n| s.name.eq_ignore_ascii_case(n.as_ref())));
        Ok(self)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Run the full matrix.
    ///
    /// Setup errors abort before any request is issued. An unreachable
    /// framework is recorded for every remaining scenario without probing it
    /// again. On cancellation the report holds everything measured so far.
    pub async fn run(&self) -> Result<ComparisonReport, SetupError> {
        let run = self.session.run_config();
        run.validate()?;
        if self.frameworks.is_empty() {
            return Err(SetupError::InvalidRunConfig("no frameworks enabled".to_string()));
        }
        if self.scenarios.is_empty() {
            return Err(SetupError::InvalidRunConfig("no scenarios selected".to_string()));
        }

        // Surface every malformed template up front
        for scenario in &self.scenarios {
            for framework in &self.frameworks {
                scenario.request_for(framework)?;
            }
        }

        let mut report = ComparisonReport::new(run);
        let mut unreachable: HashMap<&str, (String, u32, String)> = HashMap::new();

        'scenarios: for scenario in &self.scenarios {
            info!("Scenario: {}", scenario.name);

            for framework in &self.frameworks {
                if self.shutdown.is_triggered() {
                    report.cancelled = true;
                    break 'scenarios;
                }

                if let Some((url, attempts, reason)) = unreachable.get(framework.name.as_str()) {
                    report.record_unreachable(&scenario.name, &framework.name, url, *attempts, reason);
                    continue;
                }

                match self.session.run(scenario, framework).await {
                    Ok(summary) => {
                        let cancelled = summary.cancelled;
                        report.record_summary(summary);
                        if cancelled {
                            report.cancelled = true;
                            break 'scenarios;
                        }
                    }
                    Err(BenchError::TargetUnreachable {
                        url,
                        attempts,
                        reason,
                        ..
                    }) => {
                        warn!("Skipping {} for the rest of the comparison", framework.name);
                        report.record_unreachable(&scenario.name, &framework.name, &url, attempts, &reason);
                        unreachable.insert(framework.name.as_str(), (url, attempts, reason));
                    }
                    Err(BenchError::Setup(err)) => return Err(err),
                }
            }
        }

        if report.cancelled {
            warn!("Comparison cancelled after {} entries", report.entries.len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_config::ProbeConfig;
    use gauntlet_core::{FailureKind, Outcome, RunConfig};
    use gauntlet_http::RequestSpec;
    use gauntlet_resilience::ShutdownCoordinator;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Port 8080 answers with a fixed latency, anything else refuses
    struct TwoTargets {
        calls_to_down: AtomicU64,
        latency: Duration,
    }

    #[async_trait::async_trait]
    impl RequestExecutor for TwoTargets {
        async fn execute(&self, spec: &RequestSpec, _timeout: Duration) -> Outcome {
            if spec.url().port() == Some(8080) {
                tokio::time::sleep(self.latency).await;
                Outcome::from_status(self.latency, 200)
            } else {
                self.calls_to_down.fetch_add(1, Ordering::SeqCst);
                Outcome::failed(Duration::from_micros(10), FailureKind::ConnectionRefused)
            }
        }
    }

    fn fast_probe() -> ProbeConfig {
        ProbeConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            ..ProbeConfig::default()
        }
    }

    fn matrix_runner(executor: Arc<TwoTargets>, run: RunConfig) -> ComparisonRunner {
        let session = BenchmarkSession::new(executor, run, &fast_probe());
        ComparisonRunner::new(
            session,
            vec![Scenario::get("Plain Text", "/"), Scenario::get("JSON", "/json")],
            vec![
                Framework::new("up", "http://127.0.0.1:8080"),
                Framework::new("down", "http://127.0.0.1:8081"),
            ],
        )
    }

    fn targets(latency: Duration) -> Arc<TwoTargets> {
        Arc::new(TwoTargets {
            calls_to_down: AtomicU64::new(0),
            latency,
        })
    }

    #[tokio::test]
    async fn test_every_pairing_has_one_entry() {
        let executor = targets(Duration::from_micros(200));
        let report = matrix_runner(executor.clone(), RunConfig::new(20, 4)).run().await.unwrap();

        assert_eq!(report.entries.len(), 4);
        assert!(!report.cancelled);
        assert_eq!(report.summary("JSON", "up").unwrap().successes, 20);
        assert!(report.entry("Plain Text", "down").unwrap().is_unreachable());
        assert!(report.entry("JSON", "down").unwrap().is_unreachable());
        // Probed once, then remembered
        assert_eq!(executor.calls_to_down.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_setup_error_aborts_before_requests() {
        let executor = targets(Duration::ZERO);
        let session = BenchmarkSession::new(executor.clone(), RunConfig::new(10, 1), &fast_probe());
        let runner = ComparisonRunner::new(
            session,
            vec![Scenario::get("Plain Text", "/")],
            vec![
                Framework::new("down", "http://127.0.0.1:8081"),
                Framework::new("broken", "not-a-url"),
            ],
        );

        assert!(runner.run().await.is_err());
        assert_eq!(executor.calls_to_down.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_returns_partial_report() {
        let coordinator = ShutdownCoordinator::new();
        let executor = targets(Duration::from_millis(5));
        let runner = matrix_runner(executor, RunConfig::new(100_000, 2)).with_shutdown(coordinator.subscribe());

        let trigger = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.shutdown();
        });

        let report = runner.run().await.unwrap();
        assert!(report.cancelled);
        assert_eq!(report.entries.len(), 1);
        let partial = report.summary("Plain Text", "up").unwrap();
        assert!(partial.cancelled);
        assert!(partial.completed > 0);
        assert!(partial.completed < 100_000);
    }

    #[test]
    fn test_retain_scenarios() {
        let runner = matrix_runner(targets(Duration::ZERO), RunConfig::new(10, 1));
        let runner = runner.retain_scenarios(&["json"]).unwrap();
        assert_eq!(runner.scenarios().len(), 1);
        assert_eq!(runner.scenarios()[0].name, "JSON");

        let runner = matrix_runner(targets(Duration::ZERO), RunConfig::new(10, 1));
        assert!(runner.retain_scenarios(&["Websocket"]).is_err());
    }

    #[test]
    fn test_from_config_uses_enabled_frameworks() {
        let mut config = GauntletConfig::default();
        config.apply_skip(&["Actix-web"]).unwrap();
        config.load.quick = true;

        let runner = ComparisonRunner::from_config(&config, targets(Duration::ZERO)).unwrap();
        assert_eq!(runner.frameworks().len(), 1);
        assert_eq!(runner.scenarios().len(), 5);
        assert_eq!(runner.session.run_config().requests, 1_000);
    }
}
