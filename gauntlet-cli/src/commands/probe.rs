//! `gauntlet probe`

use anyhow::Result;
use colored::Colorize;
use gauntlet_config::GauntletConfig;
use gauntlet_core::BenchError;
use gauntlet_engine::{Framework, Readiness, ReadinessProbe};
use gauntlet_resilience::ShutdownCoordinator;
use std::process::ExitCode;

/// Probe every enabled framework; fails if any stays unreachable
pub async fn execute(config: GauntletConfig) -> Result<ExitCode> {
    let coordinator = ShutdownCoordinator::new();
    let ctrl_c = coordinator.spawn_ctrl_c_handler();
    let probe =
        ReadinessProbe::new(super::build_executor(&config)?, &config.probe).with_shutdown(coordinator.subscribe());

    let mut unreachable = 0;
    for framework in config.enabled_frameworks().map(Framework::from) {
        match probe.wait_ready(&framework).await {
            Ok(Readiness::Ready { attempts }) => {
                println!(
                    "{} {} ready at {} ({} attempt{})",
                    "✓".bright_green(),
                    framework.name.bold(),
                    framework.base_url,
                    attempts,
                    if attempts == 1 { "" } else { "s" }
                );
            }
            Ok(Readiness::Cancelled) => {
                println!("{} probe cancelled", "!".bright_yellow());
                break;
            }
            Err(BenchError::TargetUnreachable {
                url, attempts, reason, ..
            }) => {
                unreachable += 1;
                println!(
                    "{} {} unreachable at {} after {} attempts: {}",
                    "✗".bright_red(),
                    framework.name.bold(),
                    url,
                    attempts,
                    reason
                );
            }
            Err(BenchError::Setup(err)) => {
                ctrl_c.abort();
                return Err(err.into());
            }
        }
    }
    ctrl_c.abort();

    Ok(if unreachable == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
