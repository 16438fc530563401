//! Init command - Create a model with a freshly randomized table

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    app::App,
    cli::{
        config::load_engine_config,
        output::{format_number, print_kv, print_section},
    },
};

#[derive(Parser, Debug)]
#[command(about = "Create a model with a randomized table")]
pub struct InitArgs {
    /// Output file for the model
    #[arg(long, short = 'O')]
    pub output: PathBuf,

    /// Engine configuration file (JSON); defaults are used when omitted
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for the initial table
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overwrite an existing model
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            args.output.display()
        );
    }

    let config = load_engine_config(args.config.as_deref(), args.seed)?;
    let app = App::new();
    let learner = app
        .create_learner(&config)
        .context("invalid engine configuration")?;
    app.save_learner(&learner, &args.output)
        .with_context(|| format!("failed to save model to {}", args.output.display()))?;

    let table = learner.table();
    print_section("Model Created");
    print_kv("Path", &args.output.display().to_string());
    print_kv("Shape", &table.shape().to_string());
    print_kv("Q-values", &format_number(table.len()));
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }
    Ok(())
}
