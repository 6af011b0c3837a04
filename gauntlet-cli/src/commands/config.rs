//! `gauntlet config`

use crate::cli::ConfigCommands;
use anyhow::{anyhow, Context, Result};
use gauntlet_config::GauntletConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn handle(command: &ConfigCommands, global_config: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Validate { config_file } => {
            let path = config_file
                .as_deref()
                .or(global_config)
                .ok_or_else(|| anyhow!("No configuration file given. Use --config-file or --config."))?;
            validate(path)
        }
        ConfigCommands::Generate { output, force } => match output {
            Some(path) => generate(path, *force),
            None => {
                print!("{}", GauntletConfig::generate_sample());
                Ok(())
            }
        },
        ConfigCommands::Show { format } => {
            let config = super::load_config(global_config)?;
            println!("{}", render(&config, format)?);
            Ok(())
        }
    }
}

fn validate(path: &Path) -> Result<()> {
    info!("Validating configuration file: {}", path.display());

    if !path.exists() {
        return Err(anyhow!("Configuration file not found: {}", path.display()));
    }

    match super::load_config(Some(path)) {
        Ok(config) => {
            println!("✅ Configuration file is valid");
            println!(
                "   {} framework(s) enabled, {} scenario(s)",
                config.enabled_frameworks().count(),
                config.scenarios.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

fn generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating sample configuration at: {}", output.display());

    if output.exists() && !force {
        return Err(anyhow!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, GauntletConfig::generate_sample())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✅ Sample configuration written to {}", output.display());
    Ok(())
}

fn render(config: &GauntletConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to render configuration as YAML"),
        "json" => serde_json::to_string_pretty(config).context("Failed to render configuration as JSON"),
        other => Err(anyhow!("Unsupported format '{}'. Use yaml or json.", other)),
    }
}
