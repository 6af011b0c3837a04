//! One (scenario, framework) benchmark

use crate::driver::LoadDriver;
use crate::probe::{Readiness, ReadinessProbe};
use crate::reducer::SummaryReducer;
use crate::scenario::{Framework, Scenario};
use futures::StreamExt;
use gauntlet_config::{LoadConfig, ProbeConfig};
use gauntlet_core::{BenchError, RunConfig, Summary};
use gauntlet_http::RequestExecutor;
use gauntlet_resilience::ShutdownListener;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Probe, drive and reduce a single pairing
#[derive(Clone)]
pub struct BenchmarkSession {
    run: RunConfig,
    probe: ReadinessProbe,
    driver: LoadDriver,
}

impl BenchmarkSession {
    pub fn new(executor: Arc<dyn RequestExecutor>, run: RunConfig, probe: &ProbeConfig) -> Self {
        Self {
            run,
            probe: ReadinessProbe::new(Arc::clone(&executor), probe),
            driver: LoadDriver::new(executor),
        }
    }

    /// Cancel both the readiness wait and the load run on shutdown
    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.probe = self.probe.with_shutdown(listener.clone());
        self.driver = self.driver.with_shutdown(listener);
        self
    }

    pub fn run_config(&self) -> RunConfig {
        self.run
    }

    /// Run the session.
    ///
    /// A target that crashes mid-run still produces a summary; only setup
    /// problems and a target that never became ready are errors.
    pub async fn run(&self, scenario: &Scenario, framework: &Framework) -> Result<Summary, BenchError> {
        self.run.validate()?;
        let spec = scenario.request_for(framework)?;

        if self.probe.wait_ready(framework).await? == Readiness::Cancelled {
            info!("{} / {} cancelled before start", scenario.name, framework.name);
            return Ok(SummaryReducer::new(&scenario.name, &framework.name).finish_with(
                self.run.requests,
                Duration::ZERO,
                true,
            ));
        }

        info!(
            "Benchmarking {} / {}: {} requests, concurrency {}",
            scenario.name, framework.name, self.run.requests, self.run.concurrency
        );

        let mut stream = self.driver.execute(spec, self.run)?;
        let mut reducer =
            SummaryReducer::new(&scenario.name, &framework.name).with_capacity(self.run.requests);
        // The target answered the probe, so a refusal now means it went away
        while let Some(outcome) = stream.next().await {
            reducer.push(outcome.refused_as_transport());
        }

        let summary = reducer.finish(&stream.report());
        info!(
            "{} / {}: {:.0} req/s, mean {:?}, {} failures{}",
            summary.scenario,
            summary.framework,
            summary.requests_per_sec,
            summary.mean_latency(),
            summary.failures,
            if summary.cancelled { " (cancelled)" } else { "" }
        );

        Ok(summary)
    }
}

/// Run parameters after applying quick mode
pub fn run_config_from(load: &LoadConfig) -> RunConfig {
    RunConfig::new(load.effective_requests(), load.effective_concurrency())
        .with_timeout(load.request_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{FailureKind, Outcome};
    use gauntlet_http::RequestSpec;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Serves `healthy` successes, then behaves like a crashed server:
    /// requests already in flight lose their connection, later ones are
    /// refused.
    struct CrashingTarget {
        healthy: u64,
        in_flight_at_crash: u64,
        served: AtomicU64,
    }

    #[async_trait::async_trait]
    impl RequestExecutor for CrashingTarget {
        async fn execute(&self, spec: &RequestSpec, _timeout: Duration) -> Outcome {
            // Probe traffic goes to "/" and is not counted
            if spec.url().path() == "/" {
                return Outcome::from_status(Duration::from_micros(100), 200);
            }
            let n = self.served.fetch_add(1, Ordering::SeqCst);
            if n < self.healthy {
                Outcome::from_status(Duration::from_millis(2), 200)
            } else if n < self.healthy + self.in_flight_at_crash {
                Outcome::failed(Duration::from_micros(100), FailureKind::Transport)
            } else {
                Outcome::failed(Duration::from_micros(100), FailureKind::ConnectionRefused)
            }
        }
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl RequestExecutor for Unreachable {
        async fn execute(&self, _spec: &RequestSpec, _timeout: Duration) -> Outcome {
            Outcome::failed(Duration::from_micros(10), FailureKind::ConnectionRefused)
        }
    }

    fn fast_probe() -> ProbeConfig {
        ProbeConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..ProbeConfig::default()
        }
    }

    fn framework() -> Framework {
        Framework::new("RustAPI", "http://127.0.0.1:8080")
    }

    #[tokio::test]
    async fn test_crash_mid_run_yields_summary() {
        let target = Arc::new(CrashingTarget {
            healthy: 50,
            in_flight_at_crash: 10,
            served: AtomicU64::new(0),
        });
        let session = BenchmarkSession::new(target, RunConfig::new(100, 10), &fast_probe());

        let summary = session
            .run(&Scenario::get("JSON", "/json"), &framework())
            .await
            .unwrap();

        assert_eq!(summary.completed, 100);
        assert_eq!(summary.successes, 50);
        assert_eq!(summary.failures_of(FailureKind::Transport), 50);
        assert_eq!(summary.failures_of(FailureKind::ConnectionRefused), 0);
        assert!(!summary.degenerate);
        assert!(summary.is_complete());
    }

    #[tokio::test]
    async fn test_unreachable_target_runs_nothing() {
        let session = BenchmarkSession::new(Arc::new(Unreachable), RunConfig::new(100, 10), &fast_probe());
        let err = session
            .run(&Scenario::get("JSON", "/json"), &framework())
            .await
            .unwrap_err();

        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_invalid_run_config_is_setup_error() {
        let session = BenchmarkSession::new(Arc::new(Unreachable), RunConfig::new(0, 10), &fast_probe());
        let err = session
            .run(&Scenario::get("JSON", "/json"), &framework())
            .await
            .unwrap_err();

        assert!(err.is_fatal());
    }

    #[test]
    fn test_run_config_from_quick_mode() {
        let mut load = LoadConfig::default();
        assert_eq!(run_config_from(&load), RunConfig::new(10_000, 50));

        load.quick = true;
        let quick = run_config_from(&load);
        assert_eq!(quick.requests, 1_000);
        assert_eq!(quick.concurrency, 10);
        assert_eq!(quick.request_timeout, load.request_timeout);
    }
}
