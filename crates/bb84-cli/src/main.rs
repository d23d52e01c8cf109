//! Command-line front end for the BB84 simulator
//!
//! Runs a whole exchange at once, steps through it manually, or lets the
//! auto-run timer drive it while steps stream to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod report;

use commands::{auto, run, step};
use config::{resolve_config, ConfigOverrides};

#[derive(Parser)]
#[command(name = "bb84")]
#[command(about = "BB84 quantum key distribution simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Print snapshots as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every transmission at once and print the result
    Run,

    /// Execute a number of single steps
    Step {
        /// Steps to execute
        #[arg(long, default_value = "1")]
        count: usize,
    },

    /// Let the timer drive the run to completion
    Auto,
}

fn log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.config.as_deref(), &cli.overrides)?;
    let rng = bb84_core::source_from_seed(cli.seed);
    tracing::debug!(?config, seed = ?cli.seed, "resolved configuration");

    match cli.command {
        Commands::Run => run::execute(config, rng, cli.json)?,
        Commands::Step { count } => step::execute(config, rng, count, cli.json)?,
        Commands::Auto => auto::execute(config, rng, cli.json).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bb84",
            "step",
            "--count",
            "3",
            "--eavesdropper",
            "--error-rate",
            "0.05",
            "--seed",
            "9",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Step { count: 3 }));
        assert!(cli.overrides.eavesdropper);
        assert_eq!(cli.overrides.error_rate, Some(0.05));
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn info_unless_verbose() {
        assert_eq!(log_level(false), "info");
        assert_eq!(log_level(true), "debug");
    }

    #[test]
    fn subcommand_required() {
        assert!(Cli::try_parse_from(["bb84"]).is_err());
    }
}
