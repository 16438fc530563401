//! Ports (trait boundaries) for external collaborators.
//!
//! The engine owns these traits; the simulator, the driver and the storage
//! backends implement or consume them.

pub mod environment;
pub mod learner;
pub mod observer;
pub mod repository;

pub use environment::{Environment, StepResult};
pub use learner::Learner;
pub use observer::{EpisodeSummary, Observer, StepRecord};
pub use repository::ModelRepository;
