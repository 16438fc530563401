//! Tabular Q-learning over discretized sensor readings
//!
//! Continuous three-component readings (front, right, left clearance) are
//! mapped onto a uniform grid; each grid cell holds one Q-value per steering
//! action in a dense table.
//!
//! ## Update rule
//!
//! Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
//!
//! ## Usage Example
//!
//! ```no_run
//! use qsteer::q_learning::{ActionCatalog, Hyperparameters, QLearner, StateGrid};
//! use qsteer::SensorState;
//!
//! let mut agent = QLearner::new(
//!     StateGrid::default(),
//!     ActionCatalog::default(),
//!     Hyperparameters::new(0.1, 0.95, 0.1)?,
//! )?
//! .with_seed(7);
//!
//! let state = SensorState::new(22.0, 6.5, 8.0);
//! let action = agent.predict(&state);
//! agent.update(&state, action, 1.0, &SensorState::new(20.0, 6.0, 8.5))?;
//! agent.save("car")?;
//! # Ok::<(), qsteer::Error>(())
//! ```

pub mod actions;
pub mod agent;
pub mod discretizer;
pub mod hyperparameters;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use actions::ActionCatalog;
pub use agent::QLearner;
pub use discretizer::StateGrid;
pub use hyperparameters::Hyperparameters;
pub use q_table::QTable;
pub use serialization::{SavedModel, TableSnapshot};
