//! Dependency injection container for the steering engine.
//!
//! The container owns the model repository and provides factory methods for
//! creating, saving and loading learners.

use std::{path::Path, sync::Arc};

use tracing::debug;

use super::config::EngineConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    ports::ModelRepository,
    q_learning::QLearner,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use qsteer::app::{App, EngineConfig};
/// use qsteer::adapters::InMemoryRepository;
/// use std::path::Path;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
///
/// let learner = app.create_learner(&EngineConfig::new())?;
/// app.save_learner(&learner, Path::new("car"))?;
/// let restored = app.load_learner(Path::new("car"))?;
/// assert_eq!(restored.table(), learner.table());
/// # Ok::<(), qsteer::Error>(())
/// ```
pub struct App {
    /// Repository for model persistence
    model_repository: Arc<dyn ModelRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            model_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the model repository.
    pub fn model_repository(&self) -> Arc<dyn ModelRepository + Send + Sync> {
        Arc::clone(&self.model_repository)
    }

    /// Create a learner from a configuration.
    ///
    /// A seed in the configuration wins over the container default.
    pub fn create_learner(&self, config: &EngineConfig) -> Result<QLearner> {
        let learner = config.build()?;
        Ok(match (config.seed, self.default_seed) {
            (None, Some(seed)) => learner.with_seed(seed),
            _ => learner,
        })
    }

    /// Load a learner, adopting the grid, catalog and hyperparameters it was
    /// saved with.
    pub fn load_learner(&self, path: &Path) -> Result<QLearner> {
        let model = self.model_repository.load(path)?;
        let learner = QLearner::from_saved_model(model)?;
        debug!(path = %path.display(), shape = %learner.table().shape(), "loaded learner");
        Ok(learner)
    }

    /// Load a saved model into an existing learner.
    ///
    /// The learner is unchanged if the load fails.
    pub fn load_into(&self, learner: &mut QLearner, path: &Path) -> Result<()> {
        learner.load_from(self.model_repository.as_ref(), path)
    }

    /// Save a learner's table and hyperparameters.
    pub fn save_learner(&self, learner: &QLearner, path: &Path) -> Result<()> {
        learner.save_to(self.model_repository.as_ref(), path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    model_repository: Option<Arc<dyn ModelRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            model_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom model repository.
    pub fn with_repository<R: ModelRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.model_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all learners created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            model_repository: self
                .model_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;

    #[test]
    fn test_app_applies_default_seed() {
        let app = App::for_testing().with_default_seed(42).build();
        let a = app.create_learner(&EngineConfig::new()).unwrap();
        let b = app.create_learner(&EngineConfig::new()).unwrap();
        assert_eq!(a.table(), b.table());
    }

    #[test]
    fn test_config_seed_overrides_app_default() {
        let app = App::for_testing().with_default_seed(42).build();
        let from_app = app.create_learner(&EngineConfig::new()).unwrap();
        let from_config = app
            .create_learner(&EngineConfig::new().with_seed(123))
            .unwrap();
        let direct = EngineConfig::new().with_seed(123).build().unwrap();

        assert_ne!(from_app.table(), from_config.table());
        assert_eq!(from_config.table(), direct.table());
    }

    #[test]
    fn test_load_into_keeps_learner_on_failure() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing().with_repository(repo).build();
        let mut learner = app
            .create_learner(&EngineConfig::new().with_seed(1))
            .unwrap();
        let before = learner.table().clone();

        assert!(app.load_into(&mut learner, Path::new("missing")).is_err());
        assert_eq!(learner.table(), &before);
    }
}
