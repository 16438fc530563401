//! Dense Q-table over a discretized sensor grid

use std::path::Path;

use rand::Rng;
use tracing::debug;

use crate::{
    Error, Result,
    q_learning::{
        actions::ActionCatalog, discretizer::StateGrid, serialization::TableSnapshot,
    },
    types::{SensorState, TableShape},
};

/// Q-table mapping (grid cell, action) pairs to Q-values
///
/// Every cell is allocated up front and filled with uniform random values in
/// `[0, 1)`; there is no "unseen" marker. Values are laid out row-major as
/// `bins[0] x bins[1] x bins[2] x actions`, so the Q-values of one cell form a
/// contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    grid: StateGrid,
    actions: ActionCatalog,
    values: Vec<f64>,
}

impl QTable {
    /// Create a table with every Q-value drawn from `U[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableTooLarge`] if the grid and catalog describe more
    /// cells than can be addressed.
    pub fn random<R: Rng + ?Sized>(
        grid: StateGrid,
        actions: ActionCatalog,
        rng: &mut R,
    ) -> Result<Self> {
        let len = table_len(&grid, &actions)?;
        let values = (0..len).map(|_| rng.random::<f64>()).collect();
        Ok(Self {
            grid,
            actions,
            values,
        })
    }

    /// Create a table with every Q-value set to `value`.
    pub fn filled(grid: StateGrid, actions: ActionCatalog, value: f64) -> Result<Self> {
        let len = table_len(&grid, &actions)?;
        Ok(Self {
            grid,
            actions,
            values: vec![value; len],
        })
    }

    /// Build a table from stored values.
    ///
    /// The snapshot must declare exactly the shape of `grid` and `actions`
    /// and carry one value per cell.
    pub fn from_snapshot(
        grid: StateGrid,
        actions: ActionCatalog,
        snapshot: TableSnapshot,
    ) -> Result<Self> {
        let expected = TableShape {
            bins: grid.bins(),
            actions: actions.len(),
        };
        if snapshot.shape != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: snapshot.shape,
            });
        }
        let len = expected.cell_count()?;
        if snapshot.values.len() != len {
            return Err(Error::ValueCountMismatch {
                expected: len,
                got: snapshot.values.len(),
            });
        }
        Ok(Self {
            grid,
            actions,
            values: snapshot.values,
        })
    }

    pub fn grid(&self) -> &StateGrid {
        &self.grid
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    pub fn shape(&self) -> TableShape {
        TableShape {
            bins: self.grid.bins(),
            actions: self.actions.len(),
        }
    }

    /// All Q-values in row-major order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Total number of Q-values stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &SensorState, action: i32) -> Result<f64> {
        let index = self.cell_index(state, action)?;
        Ok(self.values[index])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: &SensorState, action: i32, value: f64) -> Result<()> {
        let index = self.cell_index(state, action)?;
        self.values[index] = value;
        Ok(())
    }

    /// Q-values of every action in the cell containing `state`, in catalog order.
    pub fn row(&self, state: &SensorState) -> &[f64] {
        let start = self.row_start(state);
        &self.values[start..start + self.actions.len()]
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: &SensorState) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value)
    ///
    /// Ties go to the lowest catalog index.
    pub fn best_action(&self, state: &SensorState) -> i32 {
        let row = self.row(state);
        let mut best = 0;
        for (index, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = index;
            }
        }
        self.actions.action_at(best)
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    ///
    /// Returns the value written.
    pub fn update(
        &mut self,
        state: &SensorState,
        action: i32,
        reward: f64,
        next_state: &SensorState,
        alpha: f64,
        gamma: f64,
    ) -> Result<f64> {
        let index = self.cell_index(state, action)?;
        let current_q = self.values[index];
        let max_next_q = self.max_q(next_state);
        let new_q = (1.0 - alpha) * current_q + alpha * (reward + gamma * max_next_q);
        self.values[index] = new_q;
        Ok(new_q)
    }

    /// Replace every value with a fresh `U[0, 1)` draw.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.values.iter_mut().for_each(|v| *v = rng.random());
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            shape: self.shape(),
            values: self.values.clone(),
        }
    }

    /// Check that `snapshot` fits this table without modifying anything.
    pub fn check_compatible(&self, snapshot: &TableSnapshot) -> Result<()> {
        let expected = self.shape();
        if snapshot.shape != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: snapshot.shape,
            });
        }
        if snapshot.values.len() != self.values.len() {
            return Err(Error::ValueCountMismatch {
                expected: self.values.len(),
                got: snapshot.values.len(),
            });
        }
        Ok(())
    }

    /// Replace all values with those of `snapshot`.
    ///
    /// The table is left untouched if the snapshot's shape or value count
    /// disagrees with the live grid and catalog.
    pub fn restore(&mut self, snapshot: TableSnapshot) -> Result<()> {
        self.check_compatible(&snapshot)?;
        self.values = snapshot.values;
        Ok(())
    }

    /// Write the table (shape and values) to `path` as MessagePack.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.snapshot().save_to_file(path)?;
        debug!(path = %path.display(), shape = %self.shape(), "saved Q-table");
        Ok(())
    }

    /// Replace the table's values with those stored at `path`.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = TableSnapshot::load_from_file(path)?;
        self.restore(snapshot)?;
        debug!(path = %path.display(), shape = %self.shape(), "loaded Q-table");
        Ok(())
    }

    fn row_start(&self, state: &SensorState) -> usize {
        let cell = self.grid.discretize(state);
        self.grid.flat_offset(cell) * self.actions.len()
    }

    fn cell_index(&self, state: &SensorState, action: i32) -> Result<usize> {
        let action_index = self.actions.index_of(action)?;
        Ok(self.row_start(state) + action_index)
    }
}

impl Default for QTable {
    /// Default grid and catalog, every value 0.
    fn default() -> Self {
        let grid = StateGrid::default();
        let actions = ActionCatalog::default();
        let len = grid.cell_count() * actions.len();
        Self {
            grid,
            actions,
            values: vec![0.0; len],
        }
    }
}

fn table_len(grid: &StateGrid, actions: &ActionCatalog) -> Result<usize> {
    TableShape {
        bins: grid.bins(),
        actions: actions.len(),
    }
    .cell_count()
}
