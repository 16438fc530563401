//! Learner port - abstraction over steering policies
//!
//! The episode driver works against this trait so it can run the Q-learner
//! and baselines (random steering) interchangeably.

use crate::{Result, types::SensorState};

/// Steering policy that may learn from single-step transitions.
///
/// # Examples
///
/// ```no_run
/// use qsteer::{SensorState, ports::Learner};
///
/// fn steer<L: Learner>(agent: &mut L, reading: SensorState) -> qsteer::Result<i32> {
///     agent.select_action(&reading)
/// }
/// ```
pub trait Learner: Send {
    /// Choose a steering action for the given sensor reading.
    fn select_action(&mut self, state: &SensorState) -> Result<i32>;

    /// Learn from one observed transition.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive policies.
    fn learn(
        &mut self,
        _state: &SensorState,
        _action: i32,
        _reward: f64,
        _next_state: &SensorState,
    ) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Discard everything learned so far.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Reseed the learner's random source for reproducible runs.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
