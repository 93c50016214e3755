mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::impact::ImpactArgs;
use commands::regulatory::{CapitalArgs, LcrArgs};
use commands::stress::{ScenariosArgs, StressArgs, StressBatchArgs};

/// Regulatory liquidity, capital adequacy and stress-testing calculations
#[derive(Parser)]
#[command(
    name = "regstress",
    version,
    about = "Regulatory liquidity, capital adequacy and stress-testing calculations",
    long_about = "A CLI for Basel-style regulatory calculations with decimal precision. \
                  Supports the Liquidity Coverage Ratio, risk-weighted capital adequacy, \
                  supervisory and custom stress scenarios, and regulatory change impact \
                  analysis. Inputs are JSON or YAML files, or JSON piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter written to stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the Liquidity Coverage Ratio
    Lcr(LcrArgs),
    /// Calculate risk-weighted capital adequacy, leverage and large exposures
    Capital(CapitalArgs),
    /// Run a single stress scenario against a base position
    Stress(StressArgs),
    /// Run several stress scenarios and summarise the outcomes
    StressBatch(StressBatchArgs),
    /// Compare compliance under the current and a proposed regime
    Impact(ImpactArgs),
    /// List the predefined supervisory scenarios
    Scenarios(ScenariosArgs),
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

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Lcr(args) => commands::regulatory::run_lcr(args),
        Commands::Capital(args) => commands::regulatory::run_capital(args),
        Commands::Stress(args) => commands::stress::run_stress(args),
        Commands::StressBatch(args) => commands::stress::run_stress_batch(args),
        Commands::Impact(args) => commands::impact::run_impact(args),
        Commands::Scenarios(args) => commands::stress::run_scenarios(args),
        Commands::Version => {
            println!("regstress {}", env!("CARGO_PKG_VERSION"));
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
