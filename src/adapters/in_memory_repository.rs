//! In-memory model repository for testing.
//!
//! Stores encoded models in a shared map, enabling fast tests without any
//! file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::ModelRepository, q_learning::SavedModel};

/// In-memory repository for testing.
///
/// Models are stored MessagePack-encoded, so a load goes through the same
/// decoding path as a file load.
///
/// # Examples
///
/// ```
/// use qsteer::adapters::InMemoryRepository;
/// use qsteer::ports::ModelRepository;
/// use qsteer::QLearner;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let learner = QLearner::default().with_seed(1);
///
/// learner.save_to(&repo, Path::new("car"))?;
/// let model = repo.load(Path::new("car"))?;
/// assert_eq!(model.table.values.len(), learner.table().len());
/// # Ok::<(), qsteer::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of models currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored models.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a model exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }

    /// Store raw bytes under `path`, bypassing encoding.
    ///
    /// Lets tests plant truncated or foreign data.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(key(path), bytes);
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl ModelRepository for InMemoryRepository {
    fn save(&self, model: &SavedModel, path: &Path) -> Result<()> {
        let bytes = model.to_bytes()?;
        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedModel> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load model from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;
        SavedModel::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::QLearner;

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let model = QLearner::default().with_seed(1).to_saved_model();
        let path = Path::new("test_model");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&model, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        assert_eq!(repo.load(path).unwrap(), model);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.load(Path::new("nonexistent")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_corrupt_entry_returns_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(Path::new("junk"), vec![0xc1, 0x00, 0x17]);
        assert!(matches!(
            repo.load(Path::new("junk")),
            Err(Error::SerializationContext { .. })
        ));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let model = QLearner::default().with_seed(2).to_saved_model();

        repo1.save(&model, Path::new("shared")).unwrap();
        assert_eq!(repo2.load(Path::new("shared")).unwrap(), model);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
