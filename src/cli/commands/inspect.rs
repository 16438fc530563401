//! Inspect command - Print the contents of a saved model

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::{
        config::parse_sensor_state,
        output::{format_number, print_kv, print_section, print_subsection},
    },
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a saved model")]
pub struct InspectArgs {
    /// Path to the model
    #[arg(long, short = 'm')]
    pub model: PathBuf,

    /// Sensor reading to look up, as `front,right,left`
    #[arg(long, short = 's', allow_hyphen_values = true)]
    pub state: Option<String>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let learner = App::new()
        .load_learner(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let table = learner.table();
    let grid = table.grid();
    let hyperparameters = learner.hyperparameters();

    print_section("Model");
    print_kv("Path", &args.model.display().to_string());
    print_kv("Shape", &table.shape().to_string());
    print_kv("Q-values", &format_number(table.len()));

    print_subsection("State grid");
    for (name, (bins, (low, high))) in ["front", "right", "left"]
        .into_iter()
        .zip(grid.bins().into_iter().zip(grid.ranges()))
    {
        print_kv(name, &format!("{bins} bins over [{low}, {high}]"));
    }

    print_subsection("Actions");
    let actions: Vec<String> = table.actions().as_slice().iter().map(i32::to_string).collect();
    print_kv("Steering", &actions.join(", "));

    print_subsection("Hyperparameters");
    print_kv("Learning rate", &hyperparameters.learning_rate.to_string());
    print_kv("Discount factor", &hyperparameters.discount_factor.to_string());
    print_kv("Epsilon", &hyperparameters.epsilon.to_string());

    let values = table.values();
    if !values.is_empty() {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        print_subsection("Q-values");
        print_kv("Min", &format!("{min:.4}"));
        print_kv("Max", &format!("{max:.4}"));
        print_kv("Mean", &format!("{mean:.4}"));
    }

    if let Some(raw) = &args.state {
        let state = parse_sensor_state(raw)?;
        print_subsection(&format!("State {state}"));
        print_kv("Grid cell", &grid.discretize(&state).to_string());
        for (action, q) in table.actions().as_slice().iter().zip(table.row(&state)) {
            print_kv(&format!("Q[{action}]"), &format!("{q:.4}"));
        }
        print_kv("Greedy action", &table.best_action(&state).to_string());
    }
    Ok(())
}
