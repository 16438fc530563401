//! Observer port - abstraction for episode observation and data collection

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    types::{EpisodeOutcome, SensorState},
};

/// One step of an episode as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub episode: usize,
    pub step: usize,
    pub state: SensorState,
    pub action: i32,
    pub reward: f64,
    pub next_state: SensorState,
}

/// Summary of a finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub total_reward: f64,
}

/// Observer trait for monitoring training
///
/// The methods are called in this order:
/// 1. `on_training_start(total_episodes)`
/// 2. For each episode: `on_episode_start`, `on_step` per step,
///    `on_episode_end`
/// 3. `on_training_end()`
///
/// Every method defaults to doing nothing.
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    fn on_step(&mut self, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
