//! Application layer with dependency injection container.
//!
//! The container owns the model repository and hands out learners built from
//! an [`EngineConfig`]. Tests swap the repository for an in-memory one.
//!
//! # Usage
//!
//! ```no_run
//! use qsteer::app::{App, EngineConfig};
//! use std::path::Path;
//!
//! let app = App::new();
//! let learner = app.create_learner(&EngineConfig::new().with_seed(42))?;
//! app.save_learner(&learner, Path::new("car.msgpack"))?;
//! # Ok::<(), qsteer::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::EngineConfig;
pub use container::{App, AppBuilder};
