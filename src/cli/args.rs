// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// How the run summary is printed after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Json,
    None,
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            other => Err(format!("unknown summary format '{}'", other)),
        }
    }
}

/// Generate CUnit and JUnit XML reports from a test run plan
#[derive(Parser, Debug)]
#[command(name = "testreport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate CUnit and JUnit XML reports from a test run plan", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a plan and write the run report
    Run(RunArgs),

    /// Write the registry listing document for a plan
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Plan file (TOML) describing suites, tests and their outcomes
    #[arg(required = true)]
    pub plan: PathBuf,

    /// Report format (cunit, junit)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Root of the report file names
    #[arg(short = 'o', long, value_name = "ROOT")]
    pub root: Option<String>,

    /// Package name used as identifier prefix
    #[arg(short = 'p', long, value_name = "NAME")]
    pub package: Option<String>,

    /// Print the run summary (text, json, none)
    #[arg(long, default_value = "text")]
    pub summary: SummaryFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Plan file (TOML) describing the registry
    #[arg(required = true)]
    pub plan: PathBuf,

    /// Report format (cunit, junit)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Root of the report file names
    #[arg(short = 'o', long, value_name = "ROOT")]
    pub root: Option<String>,
}
