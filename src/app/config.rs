//! Configuration types for learner creation.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{ActionCatalog, Hyperparameters, QLearner, StateGrid},
};

/// Configuration for creating a Q-learner.
///
/// Builder-style and serde-serializable, so the same configuration can come
/// from code or from a JSON file. Missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use qsteer::app::EngineConfig;
/// use qsteer::q_learning::{ActionCatalog, Hyperparameters};
///
/// let learner = EngineConfig::new()
///     .with_actions(ActionCatalog::evenly_spaced(-30, 30, 10)?)
///     .with_hyperparameters(Hyperparameters::new(0.2, 0.9, 0.05)?)
///     .with_seed(42)
///     .build()?;
/// assert_eq!(learner.table().actions().len(), 7);
/// # Ok::<(), qsteer::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sensor grid (bins and ranges per dimension)
    pub grid: StateGrid,
    /// Steering actions, in table column order
    pub actions: ActionCatalog,
    /// Learning rate, discount factor and exploration rate
    pub hyperparameters: Hyperparameters,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Create a configuration with the default grid, catalog and hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, grid: StateGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_actions(mut self, actions: ActionCatalog) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read a configuration from a JSON file.
    ///
    /// Grid and catalog are validated while decoding; hyperparameters when
    /// the learner is built.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Validate and build a learner with a freshly randomized table.
    pub fn build(&self) -> Result<QLearner> {
        let learner = QLearner::new(
            self.grid.clone(),
            self.actions.clone(),
            self.hyperparameters,
        )?;
        Ok(match self.seed {
            Some(seed) => learner.with_seed(seed),
            None => learner,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"hyperparameters": {"lr": 0.3, "gamma": 0.8, "epsilon": 0.0}, "seed": 9}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid, StateGrid::default());
        assert_eq!(config.actions, ActionCatalog::default());
        assert_eq!(config.hyperparameters.learning_rate, 0.3);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_invalid_grid_in_json_is_rejected() {
        let json = r#"{"grid": {"bins": [0, 10, 10], "ranges": [[0, 40], [0, 20], [0, 20]]}}"#;
        assert!(serde_json::from_str::<EngineConfig>(json).is_err());
    }

    #[test]
    fn test_build_rejects_unaddressable_table() {
        // the grid alone fits in usize; with 11 actions the table does not
        let json = r#"{"grid": {"bins": [2147483648, 2147483648, 2], "ranges": [[0, 1], [0, 1], [0, 1]]}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.build(), Err(Error::TableTooLarge { .. })));

        let json = r#"{"grid": {"bins": [4294967296, 4294967296, 2], "ranges": [[0, 1], [0, 1], [0, 1]]}}"#;
        assert!(serde_json::from_str::<EngineConfig>(json).is_err());
    }

    #[test]
    fn test_build_rejects_bad_hyperparameters() {
        let config = EngineConfig::new().with_hyperparameters(Hyperparameters {
            learning_rate: 0.0,
            discount_factor: 0.5,
            epsilon: 0.1,
        });
        assert!(matches!(
            config.build(),
            Err(Error::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_seeded_builds_are_identical() {
        let config = EngineConfig::new().with_seed(17);
        assert_eq!(
            config.build().unwrap().table(),
            config.build().unwrap().table()
        );
    }

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("engine.json");
        let config = EngineConfig::new()
            .with_actions(ActionCatalog::new(vec![-5, 0, 5]).unwrap())
            .with_seed(3);

        config.save_json(&path).unwrap();
        assert_eq!(EngineConfig::from_json_file(&path).unwrap(), config);
    }
}
