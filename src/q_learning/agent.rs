//! Epsilon-greedy Q-learning agent
//!
//! The agent owns its table, its hyperparameters and its random source.
//! Nothing is shared between agents; parallel rollouts need one agent each.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    adapters::MsgPackRepository,
    ports::{Learner, ModelRepository},
    q_learning::{
        actions::ActionCatalog,
        discretizer::StateGrid,
        hyperparameters::{Hyperparameters, validate_epsilon},
        q_table::QTable,
        serialization::SavedModel,
    },
    types::SensorState,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Selects actions ε-greedily from a dense [`QTable`] and updates it one
/// transition at a time with its own α and γ. There is no training or
/// evaluation mode: exploration is always governed by the current ε, which the
/// driver may change between calls.
#[derive(Debug, Clone)]
pub struct QLearner {
    table: QTable,
    hyperparameters: Hyperparameters,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearner {
    /// Create a learner with a freshly randomized table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] if any hyperparameter is out
    /// of range and [`Error::TableTooLarge`] if the grid and catalog describe
    /// more cells than can be addressed.
    pub fn new(
        grid: StateGrid,
        actions: ActionCatalog,
        hyperparameters: Hyperparameters,
    ) -> Result<Self> {
        hyperparameters.validate()?;
        let mut rng = build_rng(None);
        Ok(Self {
            table: QTable::random(grid, actions, &mut rng)?,
            hyperparameters,
            rng,
            rng_seed: None,
        })
    }

    /// Reseed the random source and redraw the table from it.
    ///
    /// Two learners built with the same configuration and seed are identical.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self.table.randomize(&mut self.rng);
        self
    }

    /// Use `rng` as the random source and redraw the table from it.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.rng_seed = None;
        self.table.randomize(&mut self.rng);
        self
    }

    /// Build a learner from a saved model, adopting its grid, catalog and
    /// hyperparameters.
    pub fn from_saved_model(model: SavedModel) -> Result<Self> {
        model.validate()?;
        let table = QTable::from_snapshot(model.grid, model.actions, model.table)?;
        Ok(Self {
            table,
            hyperparameters: model.hyperparameters,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn epsilon(&self) -> f64 {
        self.hyperparameters.epsilon
    }

    /// Change the exploration rate, e.g. to 0 for pure exploitation.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        validate_epsilon(epsilon)?;
        self.hyperparameters.epsilon = epsilon;
        Ok(())
    }

    pub fn set_hyperparameters(&mut self, hyperparameters: Hyperparameters) -> Result<()> {
        hyperparameters.validate()?;
        self.hyperparameters = hyperparameters;
        Ok(())
    }

    /// Current Q-value of a state-action pair
    pub fn q_value(&self, state: &SensorState, action: i32) -> Result<f64> {
        self.table.get(state, action)
    }

    /// Greedy action, ignoring ε.
    pub fn best_action(&self, state: &SensorState) -> i32 {
        self.table.best_action(state)
    }

    /// ε-greedy action selection
    ///
    /// Draws once from the learner's random source: below ε a uniformly
    /// random catalog member is returned, otherwise the greedy action.
    pub fn predict(&mut self, state: &SensorState) -> i32 {
        if self.rng.random::<f64>() < self.hyperparameters.epsilon {
            // Explore: random action
            self.table.actions().choose(&mut self.rng)
        } else {
            // Exploit: greedy action based on Q-values
            self.table.best_action(state)
        }
    }

    /// Apply one Q-learning update with the learner's α and γ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if `action` is not in the catalog.
    pub fn update(
        &mut self,
        state: &SensorState,
        action: i32,
        reward: f64,
        next_state: &SensorState,
    ) -> Result<()> {
        let new_q = self.table.update(
            state,
            action,
            reward,
            next_state,
            self.hyperparameters.learning_rate,
            self.hyperparameters.discount_factor,
        )?;
        trace!(%state, action, reward, new_q, "q update");
        Ok(())
    }

    /// Replace the table with a freshly randomized one.
    ///
    /// Grid, catalog and hyperparameters are kept.
    pub fn reset(&mut self) {
        self.table.randomize(&mut self.rng);
        debug!(shape = %self.table.shape(), "reset Q-table");
    }

    pub fn to_saved_model(&self) -> SavedModel {
        SavedModel::new(
            self.table.grid().clone(),
            self.table.actions().clone(),
            self.hyperparameters,
            self.table.snapshot(),
        )
    }

    /// Save table and hyperparameters to `path` as MessagePack.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_to(&MsgPackRepository::new(), path.as_ref())
    }

    /// Load table and hyperparameters from `path`.
    ///
    /// On any failure the learner keeps its previous table and
    /// hyperparameters.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.load_from(&MsgPackRepository::new(), path.as_ref())
    }

    pub fn save_to<R: ModelRepository + ?Sized>(&self, repo: &R, path: &Path) -> Result<()> {
        repo.save(&self.to_saved_model(), path)?;
        debug!(path = %path.display(), shape = %self.table.shape(), "saved learner");
        Ok(())
    }

    /// Load from any repository with all-or-nothing semantics.
    ///
    /// The model must have been saved under the same grid and action catalog
    /// as this learner; a model of another shape is rejected rather than
    /// reinterpreted.
    pub fn load_from<R: ModelRepository + ?Sized>(&mut self, repo: &R, path: &Path) -> Result<()> {
        let model = repo.load(path)?;
        model.validate()?;
        self.table.check_compatible(&model.table)?;
        if &model.grid != self.table.grid() {
            return Err(Error::IncompatibleModel {
                part: "state grid",
            });
        }
        if &model.actions != self.table.actions() {
            return Err(Error::IncompatibleModel {
                part: "action catalog",
            });
        }

        self.table.restore(model.table)?;
        self.hyperparameters = model.hyperparameters;
        debug!(
            path = %path.display(),
            epsilon = self.hyperparameters.epsilon,
            "loaded learner"
        );
        Ok(())
    }

    /// Reseed the random source without touching the table.
    fn reset_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

impl Default for QLearner {
    fn default() -> Self {
        let mut rng = build_rng(None);
        let mut table = QTable::default();
        table.randomize(&mut rng);
        Self {
            table,
            hyperparameters: Hyperparameters::default(),
            rng,
            rng_seed: None,
        }
    }
}

impl Learner for QLearner {
    fn select_action(&mut self, state: &SensorState) -> Result<i32> {
        Ok(self.predict(state))
    }

    fn learn(
        &mut self,
        state: &SensorState,
        action: i32,
        reward: f64,
        next_state: &SensorState,
    ) -> Result<()> {
        self.update(state, action, reward, next_state)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        QLearner::reset(self);
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.reset_rng(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
