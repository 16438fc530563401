//! Environment port - the simulator the agent drives.

use crate::{
    Result,
    types::{EpisodeOutcome, SensorState},
};

/// Result of applying one steering action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Sensor reading after the action
    pub next_state: SensorState,
    /// Reward for the transition
    pub reward: f64,
    /// `Some` when the environment ended the episode
    pub outcome: Option<EpisodeOutcome>,
}

/// A single-agent simulator producing sensor readings and rewards.
///
/// Only the driver looks at `outcome`; the learner never sees episode
/// boundaries.
pub trait Environment {
    /// Start a new episode and return the initial reading.
    fn reset(&mut self) -> Result<SensorState>;

    /// Apply a steering action.
    fn step(&mut self, action: i32) -> Result<StepResult>;
}
