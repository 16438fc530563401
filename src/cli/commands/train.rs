//! Train command - Train a model against the corridor environment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::{CorridorConfig, CorridorTrack},
    app::App,
    cli::{
        config::{load_corridor_config, load_engine_config},
        output::{print_kv, print_result, print_section, write_summary},
    },
    pipeline::{
        JsonlObserver, LoggingObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
    q_learning::Hyperparameters,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    model: String,
    shape: String,
    hyperparameters: Hyperparameters,
    corridor: CorridorConfig,
    corridor_seed: u64,
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(about = "Train a model")]
pub struct TrainArgs {
    /// Model to train (also the output unless --output is given)
    #[arg(long, short = 'm')]
    pub model: PathBuf,

    /// Output file for the trained model
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Start from a freshly randomized table instead of loading --model
    #[arg(long)]
    pub fresh: bool,

    /// Engine configuration for a fresh model (JSON)
    #[arg(long, short = 'c', requires = "fresh")]
    pub config: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 500)]
    pub episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value_t = 1_000)]
    pub max_steps: usize,

    /// Random seed for exploration and the corridor
    #[arg(long)]
    pub seed: Option<u64>,

    /// Corridor geometry (JSON)
    #[arg(long)]
    pub corridor: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every step of each episode in the observations
    #[arg(long, requires = "observations")]
    pub record_steps: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Log a rolling summary every N episodes
    #[arg(long, default_value_t = 100)]
    pub log_interval: usize,

    /// End the run at the first crash
    #[arg(long)]
    pub stop_on_crash: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let app = App::new();
    let mut learner = if args.fresh {
        let config = load_engine_config(args.config.as_deref(), args.seed)?;
        app.create_learner(&config)
            .context("invalid engine configuration")?
    } else {
        app.load_learner(&args.model)
            .with_context(|| format!("failed to load model from {}", args.model.display()))?
    };

    let corridor = load_corridor_config(args.corridor.as_deref())?;
    let corridor_seed = args.seed.unwrap_or_else(rand::random);
    let mut env = CorridorTrack::new(corridor, corridor_seed)?;

    let config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        learn: true,
        seed: args.seed,
        stop_on_crash: args.stop_on_crash,
        stop_on_goal: false,
    };
    let mut pipeline = TrainingPipeline::new(config)
        .with_observer(Box::new(LoggingObserver::new(args.log_interval)));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let mut observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        if args.record_steps {
            observer = observer.with_steps();
        }
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    println!("Training {} for {} episodes", args.model.display(), args.episodes);
    let result = pipeline.run(&mut learner, &mut env)?;

    print_section("Training Complete");
    print_result(&result);

    let output = args.output.as_ref().unwrap_or(&args.model);
    app.save_learner(&learner, output)
        .with_context(|| format!("failed to save model to {}", output.display()))?;
    print_kv("Saved to", &output.display().to_string());

    if let Some(raw) = &args.summary {
        let summary = TrainingSummaryFile {
            training: result,
            metadata: SummaryMetadata {
                model: output.display().to_string(),
                shape: learner.table().shape().to_string(),
                hyperparameters: learner.hyperparameters(),
                corridor,
                corridor_seed,
                seed: args.seed,
            },
        };
        let path = write_summary(raw, &summary)?;
        print_kv("Summary", &path.display().to_string());
    }
    Ok(())
}
