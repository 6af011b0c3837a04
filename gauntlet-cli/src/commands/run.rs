//! `gauntlet run`

use crate::cli::RunArgs;
use anyhow::{Context, Result};
use gauntlet_config::GauntletConfig;
use gauntlet_engine::{ComparisonReport, ComparisonRunner};
use gauntlet_output::ReportDestination;
use gauntlet_resilience::ShutdownCoordinator;
use std::process::ExitCode;
use tracing::{info, warn};

/// Exit status after an interrupted comparison
const EXIT_CANCELLED: u8 = 130;

/// Command-line overrides on top of the loaded configuration
pub fn apply_overrides(config: &mut GauntletConfig, args: &RunArgs) -> Result<()> {
    if let Some(requests) = args.requests {
        config.load.set_requests(requests);
    }
    if let Some(concurrency) = args.concurrency {
        config.load.set_concurrency(concurrency);
    }
    if args.quick {
        config.load.quick = true;
    }
    config.apply_skip(&args.skip)?;
    config
        .validate_all()
        .context("Invalid configuration after applying command-line overrides")?;
    Ok(())
}

/// Run the comparison and deliver the report.
///
/// Ctrl-C stops the comparison; whatever was measured is still reported.
pub async fn execute(mut config: GauntletConfig, args: RunArgs) -> Result<ExitCode> {
    apply_overrides(&mut config, &args)?;

    let coordinator = ShutdownCoordinator::new();
    let ctrl_c = coordinator.spawn_ctrl_c_handler();

    let report = compare(&config, &args, &coordinator).await;
    ctrl_c.abort();
    let report = report?;

    ReportDestination::from_path(args.output.clone())
        .deliver(&report, args.format)
        .await
        .context("Failed to deliver report")?;

    if report.cancelled {
        warn!("Comparison interrupted; report is partial");
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }
    Ok(ExitCode::SUCCESS)
}

async fn compare(
    config: &GauntletConfig,
    args: &RunArgs,
    coordinator: &ShutdownCoordinator,
) -> Result<ComparisonReport> {
    let executor = super::build_executor(config)?;
    let runner = ComparisonRunner::from_config(config, executor)
        .context("Invalid scenario configuration")?
        .with_shutdown(coordinator.subscribe())
        .retain_scenarios(&args.scenario)?;

    info!(
        "Comparing {} framework(s) across {} scenario(s)",
        runner.frameworks().len(),
        runner.scenarios().len()
    );

    let report = runner.run().await.context("Comparison aborted during setup")?;
    Ok(report)
}
