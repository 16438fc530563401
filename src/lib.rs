//! Tabular Q-learning engine for a sensor-driven steering agent
//!
//! This crate provides:
//! - Discretization of three distance sensors (front, right, left) onto a grid
//! - A dense, randomly initialized Q-table over grid cells and steering actions
//! - An ε-greedy learner with the standard Bellman update
//! - Atomic, validated model persistence (MessagePack)
//! - An episode driver with observers and a reference corridor environment

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{
    ActionCatalog, Hyperparameters, QLearner, QTable, SavedModel, StateGrid, TableSnapshot,
};
pub use types::{EpisodeOutcome, GridCell, SensorState, TableShape};
