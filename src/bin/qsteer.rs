//! qsteer CLI - Train and inspect Q-learning steering agents
//!
//! This CLI provides a unified interface for:
//! - Creating a fresh model from an engine configuration
//! - Training a model against the reference corridor
//! - Evaluating the greedy policy of a saved model
//! - Inspecting a saved table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Parser)]
#[command(name = "qsteer")]
#[command(version, about = "Q-learning toolkit for sensor-driven steering", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a model with a freshly randomized table
    Init(qsteer::cli::commands::init::InitArgs),

    /// Train a model against the corridor environment
    Train(qsteer::cli::commands::train::TrainArgs),

    /// Run the greedy policy of a saved model without learning
    Evaluate(qsteer::cli::commands::evaluate::EvaluateArgs),

    /// Print the shape, configuration and values of a saved model
    Inspect(qsteer::cli::commands::inspect::InspectArgs),
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Init(args) => qsteer::cli::commands::init::execute(args),
        Commands::Train(args) => qsteer::cli::commands::train::execute(args),
        Commands::Evaluate(args) => qsteer::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => qsteer::cli::commands::inspect::execute(args),
    }
}
