//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use gauntlet_output::ReportFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark every enabled framework with every scenario
    Run(RunArgs),

    /// Check that every enabled framework answers its readiness endpoint
    Probe,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Requests per (scenario, framework) run
    #[arg(long, short = 'n', value_name = "N")]
    pub requests: Option<u64>,

    /// Maximum requests in flight
    #[arg(long, short = 'c', value_name = "C")]
    pub concurrency: Option<usize>,

    /// Smoke-test mode with a reduced request count
    #[arg(long)]
    pub quick: bool,

    /// Framework to leave out (repeatable)
    #[arg(long, value_name = "NAME")]
    pub skip: Vec<String>,

    /// Only run the named scenario (repeatable)
    #[arg(long, value_name = "NAME")]
    pub scenario: Vec<String>,

    /// Report format: table, markdown, json
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (defaults to --config)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path; stdout when omitted
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration in effect after environment overrides
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}
