//! Episode driver and observation pipeline
//!
//! This module provides:
//! - An episode driver that runs a learner against an environment
//! - Observers for progress, logging and JSONL export
//! - Baseline learners for evaluation runs

pub mod comparison;
pub mod observers;
pub mod training;

pub use comparison::{FrozenLearner, RandomLearner};
pub use observers::{EpisodeObservation, JsonlObserver, LoggingObserver, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Learner, Observer};
