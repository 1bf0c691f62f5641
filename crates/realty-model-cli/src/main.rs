mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

use commands::scenarios::{AnalyzeArgs, ProjectArgs, SensitivityArgs};
use commands::time_value::{IrrArgs, NpvArgs};

/// Multi-scenario real estate investment projections
#[derive(Parser)]
#[command(
    name = "rmx",
    version,
    about = "Multi-scenario real estate investment projections",
    long_about = "A CLI for projecting rental property investments across conservative, \
                  moderate and optimistic scenarios with decimal precision. Converts \
                  between source and reporting currencies, applies depreciation and \
                  capital gains tax, and reports IRR, NPV and break-even."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Diagnostic log format (written to stderr, level from RUST_LOG)
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project all three scenarios for a property
    Analyze(AnalyzeArgs),
    /// Project a single scenario year by year
    Project(ProjectArgs),
    /// Sweep one driver across a range and re-run a scenario
    Sensitivity(SensitivityArgs),
    /// Internal rate of return of a cash flow series
    Irr(IrrArgs),
    /// Net present value of a cash flow series
    Npv(NpvArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: &LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Text => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(e) = result {
        eprintln!("failed to initialise logging: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_format);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::scenarios::run_analyze(args),
        Commands::Project(args) => commands::scenarios::run_project(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Irr(args) => commands::time_value::run_irr(args),
        Commands::Npv(args) => commands::time_value::run_npv(args),
        Commands::Version => {
            println!("rmx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
