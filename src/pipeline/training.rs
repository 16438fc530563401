//! Episode driver for steering learners

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    ports::{Environment, EpisodeSummary, Learner, Observer, StepRecord},
    types::EpisodeOutcome,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Step cap per episode; hitting it ends the episode as timed out
    pub max_steps: usize,

    /// Whether the learner is updated after every step
    pub learn: bool,

    /// Random seed for the learner's exploration
    pub seed: Option<u64>,

    /// End the whole run at the first crash instead of starting a new episode
    pub stop_on_crash: bool,

    /// End the whole run the first time the goal is reached
    pub stop_on_goal: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_steps: 1_000,
            learn: true,
            seed: None,
            stop_on_crash: false,
            stop_on_goal: false,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes actually run
    pub total_episodes: usize,

    /// Episodes that reached the goal
    pub goals: usize,

    /// Episodes that ended in a crash
    pub crashes: usize,

    /// Episodes cut off by the step cap
    pub timeouts: usize,

    pub goal_rate: f64,

    pub crash_rate: f64,

    /// Mean undiscounted return per episode
    pub mean_return: f64,

    /// Mean episode length in steps
    pub mean_steps: f64,
}

impl TrainingResult {
    /// Aggregate a run from its episode summaries
    pub fn from_episodes(episodes: &[EpisodeSummary]) -> Self {
        let count = |outcome: EpisodeOutcome| {
            episodes.iter().filter(|e| e.outcome == outcome).count()
        };
        let goals = count(EpisodeOutcome::ReachedGoal);
        let crashes = count(EpisodeOutcome::Crashed);
        let timeouts = count(EpisodeOutcome::TimedOut);

        let total = episodes.len();
        let rate = |n: usize| if total > 0 { n as f64 / total as f64 } else { 0.0 };
        let mean = |sum: f64| if total > 0 { sum / total as f64 } else { 0.0 };

        Self {
            total_episodes: total,
            goals,
            crashes,
            timeouts,
            goal_rate: rate(goals),
            crash_rate: rate(crashes),
            mean_return: mean(episodes.iter().map(|e| e.total_reward).sum()),
            mean_steps: mean(episodes.iter().map(|e| e.steps as f64).sum()),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a learner through episodes of an environment.
///
/// The learner never sees episode boundaries; the pipeline decides when an
/// episode ends (environment outcome or step cap) and resets the environment.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run all configured episodes
    pub fn run(
        &mut self,
        learner: &mut dyn Learner,
        env: &mut dyn Environment,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            learner.set_rng_seed(seed)?;
        }

        info!(
            learner = learner.name(),
            episodes = self.config.episodes,
            learn = self.config.learn,
            "starting run"
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut summaries = Vec::with_capacity(self.config.episodes);
        for episode in 0..self.config.episodes {
            let summary = self.run_episode(episode, learner, env)?;
            summaries.push(summary);

            let stop = match summary.outcome {
                EpisodeOutcome::Crashed => self.config.stop_on_crash,
                EpisodeOutcome::ReachedGoal => self.config.stop_on_goal,
                EpisodeOutcome::TimedOut => false,
            };
            if stop {
                debug!(episode, outcome = %summary.outcome, "stopping run early");
                break;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_episodes(&summaries);
        info!(
            episodes = result.total_episodes,
            goal_rate = result.goal_rate,
            crash_rate = result.crash_rate,
            mean_return = result.mean_return,
            "run finished"
        );
        Ok(result)
    }

    fn run_episode(
        &mut self,
        episode: usize,
        learner: &mut dyn Learner,
        env: &mut dyn Environment,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state = env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut outcome = EpisodeOutcome::TimedOut;

        while steps < self.config.max_steps {
            let action = learner.select_action(&state)?;
            let result = env.step(action)?;

            if self.config.learn {
                learner.learn(&state, action, result.reward, &result.next_state)?;
            }

            let record = StepRecord {
                episode,
                step: steps,
                state,
                action,
                reward: result.reward,
                next_state: result.next_state,
            };
            for observer in &mut self.observers {
                observer.on_step(&record)?;
            }

            total_reward += result.reward;
            steps += 1;
            state = result.next_state;

            if let Some(ended) = result.outcome {
                outcome = ended;
                break;
            }
        }

        let summary = EpisodeSummary {
            episode,
            outcome,
            steps,
            total_reward,
        };
        for observer in &mut self.observers {
            observer.on_episode_end(&summary)?;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        ports::StepResult,
        q_learning::{ActionCatalog, Hyperparameters, QLearner, StateGrid},
        types::SensorState,
    };

    /// Ends after `length` steps; crashes if any action other than 0 was taken.
    struct Lane {
        length: usize,
        position: usize,
        swerved: bool,
    }

    impl Lane {
        fn new(length: usize) -> Self {
            Self {
                length,
                position: 0,
                swerved: false,
            }
        }
    }

    impl Environment for Lane {
        fn reset(&mut self) -> Result<SensorState> {
            self.position = 0;
            self.swerved = false;
            Ok(SensorState::new(self.length as f64, 5.0, 5.0))
        }

        fn step(&mut self, action: i32) -> Result<StepResult> {
            self.position += 1;
            self.swerved |= action != 0;
            let next_state = SensorState::new((self.length - self.position) as f64, 5.0, 5.0);
            let (reward, outcome) = if self.swerved {
                (-1.0, Some(EpisodeOutcome::Crashed))
            } else if self.position == self.length {
                (1.0, Some(EpisodeOutcome::ReachedGoal))
            } else {
                (0.0, None)
            };
            Ok(StepResult {
                next_state,
                reward,
                outcome,
            })
        }
    }

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Observer for Recorder {
        fn on_training_start(&mut self, total: usize) -> Result<()> {
            self.0.lock().unwrap().push(format!("start {total}"));
            Ok(())
        }

        fn on_step(&mut self, record: &StepRecord) -> Result<()> {
            self.0
                .lock()
                .unwrap()
                .push(format!("step {}.{}", record.episode, record.step));
            Ok(())
        }

        fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
            self.0
                .lock()
                .unwrap()
                .push(format!("end {} {}", summary.episode, summary.outcome));
            Ok(())
        }

        fn on_training_end(&mut self) -> Result<()> {
            self.0.lock().unwrap().push("done".to_string());
            Ok(())
        }
    }

    fn straight_only_learner() -> QLearner {
        QLearner::new(
            StateGrid::default(),
            ActionCatalog::new(vec![0]).unwrap(),
            Hyperparameters::new(0.5, 0.9, 0.0).unwrap(),
        )
        .unwrap()
        .with_seed(1)
    }

    #[test]
    fn test_result_rates() {
        let summaries = [
            EpisodeSummary {
                episode: 0,
                outcome: EpisodeOutcome::ReachedGoal,
                steps: 10,
                total_reward: 4.0,
            },
            EpisodeSummary {
                episode: 1,
                outcome: EpisodeOutcome::Crashed,
                steps: 2,
                total_reward: -2.0,
            },
        ];
        let result = TrainingResult::from_episodes(&summaries);
        assert_eq!(result.total_episodes, 2);
        assert_eq!(result.goals, 1);
        assert_eq!(result.crashes, 1);
        assert_eq!(result.goal_rate, 0.5);
        assert_eq!(result.mean_return, 1.0);
        assert_eq!(result.mean_steps, 6.0);
        assert_eq!(TrainingResult::from_episodes(&[]).goal_rate, 0.0);
    }

    #[test]
    fn test_observer_event_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let config = TrainingConfig {
            episodes: 2,
            ..TrainingConfig::default()
        };
        let mut pipeline =
            TrainingPipeline::new(config).with_observer(Box::new(Recorder(log.clone())));

        let mut learner = straight_only_learner();
        let result = pipeline.run(&mut learner, &mut Lane::new(2)).unwrap();
        assert_eq!(result.goals, 2);

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start 2",
                "step 0.0",
                "step 0.1",
                "end 0 reached_goal",
                "step 1.0",
                "step 1.1",
                "end 1 reached_goal",
                "done",
            ]
        );
    }

    #[test]
    fn test_step_cap_times_out() {
        let config = TrainingConfig {
            episodes: 3,
            max_steps: 4,
            ..TrainingConfig::default()
        };
        let mut learner = straight_only_learner();
        let result = TrainingPipeline::new(config)
            .run(&mut learner, &mut Lane::new(100))
            .unwrap();
        assert_eq!(result.timeouts, 3);
        assert_eq!(result.mean_steps, 4.0);
    }

    #[test]
    fn test_learn_flag_controls_updates() {
        let config = TrainingConfig {
            episodes: 5,
            learn: false,
            ..TrainingConfig::default()
        };
        let mut learner = straight_only_learner();
        let before = learner.table().clone();
        TrainingPipeline::new(config)
            .run(&mut learner, &mut Lane::new(3))
            .unwrap();
        assert_eq!(learner.table(), &before);

        let config = TrainingConfig {
            episodes: 5,
            ..TrainingConfig::default()
        };
        TrainingPipeline::new(config)
            .run(&mut learner, &mut Lane::new(3))
            .unwrap();
        assert_ne!(learner.table(), &before);
    }

    #[test]
    fn test_stop_on_crash() {
        let config = TrainingConfig {
            episodes: 10,
            stop_on_crash: true,
            ..TrainingConfig::default()
        };
        let mut learner = QLearner::new(
            StateGrid::default(),
            ActionCatalog::new(vec![8]).unwrap(),
            Hyperparameters::default(),
        )
        .unwrap();
        let result = TrainingPipeline::new(config)
            .run(&mut learner, &mut Lane::new(5))
            .unwrap();
        assert_eq!(result.total_episodes, 1);
        assert_eq!(result.crashes, 1);
    }
}
