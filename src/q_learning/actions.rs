//! Fixed catalog of discrete steering actions

use std::collections::HashMap;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Ordered, immutable set of steering deltas (degrees).
///
/// The order defines the column layout of the value table, so a catalog must
/// not change for the lifetime of a table. Lookups by value go through a map
/// built once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct ActionCatalog {
    actions: Vec<i32>,
    index: HashMap<i32, usize>,
}

impl ActionCatalog {
    /// Build a catalog from an ordered list of distinct actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionCatalog`] for an empty list and
    /// [`Error::DuplicateAction`] if a value repeats.
    pub fn new(actions: Vec<i32>) -> Result<Self> {
        if actions.is_empty() {
            return Err(Error::EmptyActionCatalog);
        }

        let mut index = HashMap::with_capacity(actions.len());
        for (position, &action) in actions.iter().enumerate() {
            if index.insert(action, position).is_some() {
                return Err(Error::DuplicateAction { action });
            }
        }

        Ok(Self { actions, index })
    }

    /// Evenly spaced actions from `min` to `max` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `step > 0` and
    /// `min <= max`.
    pub fn evenly_spaced(min: i32, max: i32, step: i32) -> Result<Self> {
        if step <= 0 || min > max {
            return Err(Error::InvalidConfiguration {
                message: format!("cannot space actions from {min} to {max} by {step}"),
            });
        }
        Self::new((min..=max).step_by(step as usize).collect())
    }

    /// Position of `action` in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if `action` is not a member.
    pub fn index_of(&self, action: i32) -> Result<usize> {
        self.index
            .get(&action)
            .copied()
            .ok_or(Error::UnknownAction { action })
    }

    /// Action stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`; indices produced by the table are
    /// always in range.
    pub fn action_at(&self, index: usize) -> i32 {
        self.actions[index]
    }

    pub fn contains(&self, action: i32) -> bool {
        self.index.contains_key(&action)
    }

    /// Uniformly random member of the catalog.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        // never empty by construction
        *self.actions.choose(rng).unwrap_or(&self.actions[0])
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.actions
    }
}

impl Default for ActionCatalog {
    /// Eleven steering deltas from -40 to 40 in steps of 8.
    fn default() -> Self {
        let actions: Vec<i32> = (-40..=40).step_by(8).collect();
        let index = actions.iter().enumerate().map(|(i, &a)| (a, i)).collect();
        Self { actions, index }
    }
}

impl PartialEq for ActionCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions
    }
}

impl Eq for ActionCatalog {}

impl TryFrom<Vec<i32>> for ActionCatalog {
    type Error = Error;

    fn try_from(actions: Vec<i32>) -> Result<Self> {
        ActionCatalog::new(actions)
    }
}

impl From<ActionCatalog> for Vec<i32> {
    fn from(catalog: ActionCatalog) -> Self {
        catalog.actions
    }
}
