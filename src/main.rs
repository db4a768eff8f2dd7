// Main entry point for testreport

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{debug, info};

use testreport::cli::{Cli, Commands, ListArgs, RunArgs, SummaryFormat};
use testreport::config::{self, Config};
use testreport::engine::{ExecutionEngine, Plan, ScriptedEngine};
use testreport::report::{self, ListOutcome, ReportFormat};
use testreport::state::RunSummary;
use testreport::{Automated, logging};

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = Config::load().unwrap_or_default();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting testreport v{}", env!("CARGO_PKG_VERSION"));
    }

    if cli.config {
        print_config(&config);
        return Ok(());
    }

    if let Some(config_file) = cli.init_config {
        std::fs::write(&config_file, Config::default().to_toml())
            .with_context(|| format!("Failed to write {}", config_file.display()))?;
        println!("Configuration file created: {}", config_file.display());
        return Ok(());
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let summary = run_command(&args, &config)?;
            if summary.tests_failed > 0 || summary.suites_failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::List(args)) => list_command(&args, &config),
        None => Err(anyhow!("no command given, see `testreport --help`")),
    }
}

fn select_format(requested: Option<&str>, config: &Config) -> Result<Box<dyn ReportFormat>> {
    let name = requested.unwrap_or(&config.report.format);
    report::format_by_name(name).ok_or_else(|| anyhow!("unknown report format '{}'", name))
}

/// Command line wins over the config file, which wins over the environment
fn output_root(requested: Option<&str>, config: &Config) -> Option<String> {
    requested
        .map(str::to_string)
        .or_else(|| config.report.output_root.clone())
        .or_else(|| std::env::var(config::ENV_TESTREPORT_OUTPUT_ROOT).ok())
}

fn run_command(args: &RunArgs, config: &Config) -> Result<RunSummary> {
    let plan = Plan::from_file(&args.plan)?;
    let mut engine = ScriptedEngine::new(plan);

    let mut automated = Automated::with_format(select_format(args.format.as_deref(), config)?);
    if let Some(root) = output_root(args.root.as_deref(), config) {
        automated.set_output_filename(Some(&root));
    }
    automated.set_package_name(
        args.package
            .as_deref()
            .or(config.report.package_name.as_deref()),
    );
    debug!(
        "Running {} suites",
        engine.registry().map(|r| r.suite_count()).unwrap_or(0)
    );

    let summary = automated
        .run(&mut engine)
        .with_context(|| format!("Failed to write report for {}", args.plan.display()))?;

    match args.summary {
        SummaryFormat::Text => print_summary(&summary),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        SummaryFormat::None => {}
    }
    Ok(summary)
}

fn list_command(args: &ListArgs, config: &Config) -> Result<()> {
    let plan = Plan::from_file(&args.plan)?;
    let registry = plan.registry();

    let mut automated = Automated::with_format(select_format(args.format.as_deref(), config)?);
    if let Some(root) = output_root(args.root.as_deref(), config) {
        automated.set_output_filename(Some(&root));
    }

    match automated.list_tests_to_file(Some(&registry))? {
        ListOutcome::Written => println!("Listing written for {} suites", registry.suite_count()),
        ListOutcome::NotSupported => println!("The selected format has no listing document"),
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Run Summary:    Type   Ran  Passed  Failed  Inactive");
    println!(
        "              suites {:>5}     n/a {:>7} {:>9}",
        summary.suites_run, summary.suites_failed, summary.suites_inactive
    );
    println!(
        "               tests {:>5} {:>7} {:>7} {:>9}",
        summary.tests_run,
        summary.tests_succeeded(),
        summary.tests_failed,
        summary.tests_inactive
    );
    println!(
        "             asserts {:>5} {:>7} {:>7}       n/a",
        summary.asserts,
        summary.asserts_succeeded(),
        summary.asserts_failed
    );
    println!("Elapsed time = {:.3} seconds", summary.elapsed_ms as f64 / 1000.0);
}

fn print_config(config: &Config) {
    println!("Current configuration:");
    println!("    Format: {}", config.report.format);
    match config.report.output_root {
        Some(ref root) => println!("    Output root: {}", root),
        None => println!("    Output root: not set"),
    }
    match config.report.package_name {
        Some(ref name) => println!("    Package name: {}", name),
        None => println!("    Package name: not set"),
    }
    if let Ok(root) = std::env::var(config::ENV_TESTREPORT_OUTPUT_ROOT) {
        println!("    {}: {}", config::ENV_TESTREPORT_OUTPUT_ROOT, root);
    }

    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file ({})", config::CONFIG_FILE_NAME);
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
