//! Newtype wrappers for the engine's state and shape vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of sensor dimensions (front, right, left clearance).
pub const SENSOR_DIMS: usize = 3;

/// A continuous sensor reading: front, right and left wall clearances.
///
/// Values are not bounded here; out-of-range readings are clipped when the
/// state is discretized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorState([f64; SENSOR_DIMS]);

impl SensorState {
    /// Create a reading from its three clearances.
    pub const fn new(front: f64, right: f64, left: f64) -> Self {
        Self([front, right, left])
    }

    pub fn front(&self) -> f64 {
        self.0[0]
    }

    pub fn right(&self) -> f64 {
        self.0[1]
    }

    pub fn left(&self) -> f64 {
        self.0[2]
    }

    /// Get the raw components in sensor order.
    pub fn values(&self) -> &[f64; SENSOR_DIMS] {
        &self.0
    }
}

impl From<[f64; SENSOR_DIMS]> for SensorState {
    fn from(values: [f64; SENSOR_DIMS]) -> Self {
        Self(values)
    }
}

impl From<(f64, f64, f64)> for SensorState {
    fn from((front, right, left): (f64, f64, f64)) -> Self {
        Self::new(front, right, left)
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(front={:.2}, right={:.2}, left={:.2})",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

/// Per-dimension bin indices of a discretized [`SensorState`].
///
/// Always recomputed from a reading; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell([usize; SENSOR_DIMS]);

impl GridCell {
    pub(crate) const fn new(indices: [usize; SENSOR_DIMS]) -> Self {
        Self(indices)
    }

    /// Get the bin index of each dimension.
    pub fn indices(&self) -> [usize; SENSOR_DIMS] {
        self.0
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// Declared shape of a dense value table: bins per dimension and action count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableShape {
    pub bins: [usize; SENSOR_DIMS],
    pub actions: usize,
}

impl TableShape {
    /// Total number of cells in the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableTooLarge`] if the count overflows `usize`.
    pub fn cell_count(&self) -> Result<usize> {
        self.bins
            .iter()
            .try_fold(self.actions, |acc, &bins| acc.checked_mul(bins))
            .ok_or(Error::TableTooLarge { shape: *self })
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}x{}",
            self.bins[0], self.bins[1], self.bins[2], self.actions
        )
    }
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The car reached its destination.
    ReachedGoal,
    /// The car hit a wall.
    Crashed,
    /// The driver's step cap was hit before the environment ended the episode.
    TimedOut,
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EpisodeOutcome::ReachedGoal => "reached_goal",
            EpisodeOutcome::Crashed => "crashed",
            EpisodeOutcome::TimedOut => "timed_out",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_state_accessors() {
        let state = SensorState::new(12.0, 3.5, 7.25);
        assert_eq!(state.front(), 12.0);
        assert_eq!(state.right(), 3.5);
        assert_eq!(state.left(), 7.25);
        assert_eq!(SensorState::from((12.0, 3.5, 7.25)), state);
    }

    #[test]
    fn test_table_shape_cell_count() {
        let shape = TableShape {
            bins: [10, 10, 10],
            actions: 11,
        };
        assert_eq!(shape.cell_count().unwrap(), 11_000);
        assert_eq!(shape.to_string(), "10x10x10x11");
    }

    #[test]
    fn test_table_shape_cell_count_overflow() {
        let shape = TableShape {
            bins: [1 << 32, 1 << 32, 2],
            actions: 11,
        };
        assert!(matches!(
            shape.cell_count(),
            Err(Error::TableTooLarge { .. })
        ));
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&EpisodeOutcome::ReachedGoal).unwrap();
        assert_eq!(json, "\"reached_goal\"");
    }
}
