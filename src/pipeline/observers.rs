//! Observer implementations for the episode driver
//!
//! Observers allow composable data collection during training without coupling
//! the driver to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{EpisodeSummary, Observer, StepRecord},
    types::EpisodeOutcome,
};

/// Progress bar observer - Shows episode progress with goal/crash counts
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals: usize,
    crashes: usize,
    timeouts: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals: 0,
            crashes: 0,
            timeouts: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} C:{} T:{}", self.goals, self.crashes, self.timeouts)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (G:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::ReachedGoal => self.goals += 1,
            EpisodeOutcome::Crashed => self.crashes += 1,
            EpisodeOutcome::TimedOut => self.timeouts += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Complete observation of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub total_reward: f64,
    pub total_steps: usize,
    /// Per-step records, present only when step capture is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepRecord>,
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    capture_steps: bool,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing episode summaries only
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create observations file {path:?}"),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            capture_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also record every step of each episode (the car's path)
    pub fn with_steps(mut self) -> Self {
        self.capture_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        if self.capture_steps {
            self.current_steps.push(*record);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = EpisodeObservation {
            episode: summary.episode,
            outcome: summary.outcome,
            total_reward: summary.total_reward,
            total_steps: summary.steps,
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs a rolling summary through `tracing` every `interval` episodes
pub struct LoggingObserver {
    interval: usize,
    window_goals: usize,
    window_crashes: usize,
    window_reward: f64,
    window_len: usize,
    last_episode: usize,
}

impl LoggingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            window_goals: 0,
            window_crashes: 0,
            window_reward: 0.0,
            window_len: 0,
            last_episode: 0,
        }
    }

    fn flush_window(&mut self) {
        if self.window_len == 0 {
            return;
        }
        let n = self.window_len as f64;
        info!(
            through_episode = self.last_episode,
            goal_rate = self.window_goals as f64 / n,
            crash_rate = self.window_crashes as f64 / n,
            mean_return = self.window_reward / n,
            "episode window"
        );
        self.window_goals = 0;
        self.window_crashes = 0;
        self.window_reward = 0.0;
        self.window_len = 0;
    }
}

impl Observer for LoggingObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::ReachedGoal => self.window_goals += 1,
            EpisodeOutcome::Crashed => self.window_crashes += 1,
            EpisodeOutcome::TimedOut => {}
        }
        self.window_reward += summary.total_reward;
        self.window_len += 1;
        self.last_episode = summary.episode;

        if self.window_len == self.interval {
            self.flush_window();
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.flush_window();
        Ok(())
    }
}
