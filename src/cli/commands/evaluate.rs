//! Evaluate command - Replay the greedy policy of a saved model

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::{CorridorConfig, CorridorTrack},
    app::App,
    cli::{
        config::load_corridor_config,
        output::{print_kv, print_result, print_section, print_subsection, write_summary},
    },
    pipeline::{
        FrozenLearner, Learner, ProgressObserver, RandomLearner, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained model")]
pub struct EvaluateArgs {
    /// Path to the trained model
    #[arg(long, short = 'm')]
    pub model: PathBuf,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value_t = 1_000)]
    pub max_steps: usize,

    /// Random seed for the corridor's starting headings
    #[arg(long)]
    pub seed: Option<u64>,

    /// Corridor geometry (JSON)
    #[arg(long)]
    pub corridor: Option<PathBuf>,

    /// Also run a uniform-random learner over the same starts
    #[arg(long)]
    pub baseline: bool,

    /// Export results to file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationSummary {
    model: String,
    corridor: CorridorConfig,
    corridor_seed: u64,
    greedy: TrainingResult,
    baseline: Option<TrainingResult>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();
    let learner = app
        .load_learner(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let actions = learner.table().actions().clone();

    let corridor = load_corridor_config(args.corridor.as_deref())?;
    let corridor_seed = args.seed.unwrap_or_else(rand::random);

    let mut greedy = FrozenLearner::new("Greedy".to_string(), learner)?;
    let greedy_result = evaluate(&args, &mut greedy, corridor, corridor_seed)?;

    print_section("Evaluation");
    print_kv("Model", &args.model.display().to_string());
    print_kv("Corridor seed", &corridor_seed.to_string());
    print_subsection("Greedy policy");
    print_result(&greedy_result);

    let baseline_result = if args.baseline {
        let seed = args.seed.unwrap_or(corridor_seed).wrapping_add(1);
        let mut random = RandomLearner::with_seed("Random".to_string(), actions, seed);
        let result = evaluate(&args, &mut random, corridor, corridor_seed)?;
        print_subsection("Random baseline");
        print_result(&result);
        Some(result)
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let summary = EvaluationSummary {
            model: args.model.display().to_string(),
            corridor,
            corridor_seed,
            greedy: greedy_result,
            baseline: baseline_result,
        };
        let path = write_summary(raw, &summary)?;
        print_kv("Summary", &path.display().to_string());
    }
    Ok(())
}

/// Run one learner without updates over a corridor seeded with `corridor_seed`
fn evaluate(
    args: &EvaluateArgs,
    learner: &mut dyn Learner,
    corridor: CorridorConfig,
    corridor_seed: u64,
) -> Result<TrainingResult> {
    let mut env = CorridorTrack::new(corridor, corridor_seed)?;
    let config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        learn: false,
        ..TrainingConfig::default()
    };

    let mut pipeline = TrainingPipeline::new(config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    Ok(pipeline.run(learner, &mut env)?)
}
