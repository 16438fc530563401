//! Repository port for model persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedModel};

/// Port for persisting and loading saved learners.
///
/// # Examples
///
/// ```no_run
/// use qsteer::adapters::MsgPackRepository;
/// use qsteer::ports::ModelRepository;
/// use qsteer::QLearner;
/// use std::path::Path;
///
/// let learner = QLearner::default().with_seed(7);
/// let repo = MsgPackRepository::new();
/// repo.save(&learner.to_saved_model(), Path::new("car.msgpack"))?;
/// let model = repo.load(Path::new("car.msgpack"))?;
/// # Ok::<(), qsteer::Error>(())
/// ```
pub trait ModelRepository {
    /// Save a model as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be written or serialization
    /// fails. Implementations must not leave a partially written model
    /// behind at `path`.
    fn save(&self, model: &SavedModel, path: &Path) -> Result<()>;

    /// Load a model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model does not exist, cannot be read or
    /// cannot be decoded.
    fn load(&self, path: &Path) -> Result<SavedModel>;
}
