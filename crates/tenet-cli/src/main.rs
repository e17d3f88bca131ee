//! Tenet CLI - Evaluate constraint expressions against values

mod checks;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, eval};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tenet")]
#[command(about = "Check values against human-readable constraints", long_about = None)]
#[command(version)]
struct Cli {
    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one expression against one value
    Eval {
        /// Constraint expression (e.g., "starts with 'hello' ignoring case")
        expr: String,

        /// Value to check, as JSON
        #[arg(long, default_value = "null")]
        value: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run every check in a TOML check file
    Check {
        /// Path to check file
        file: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Stop at the first check that does not pass
        #[arg(long, overrides_with = "no_fail_fast")]
        fail_fast: bool,

        /// Run every check even if the file sets fail_fast
        #[arg(long, overrides_with = "fail_fast")]
        no_fail_fast: bool,
    },
}

/// Collapse the flag pair; neither flag leaves the file setting in charge
fn fail_fast_flag(fail_fast: bool, no_fail_fast: bool) -> Option<bool> {
    match (fail_fast, no_fail_fast) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval {
            expr,
            value,
            format,
        } => eval::run(&expr, &value, &format),
        Commands::Check {
            file,
            format,
            fail_fast,
            no_fail_fast,
        } => check::run(check::CheckArgs {
            file,
            format,
            fail_fast: fail_fast_flag(fail_fast, no_fail_fast),
        }),
    }
}
