//! MessagePack implementation of the model repository.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{Result, error::Error, ports::ModelRepository, q_learning::SavedModel};

/// MessagePack-based model repository.
///
/// Saves are atomic: the model is written to a hidden sibling file which is
/// then renamed over the target, so readers see either the old model or the
/// new one, never a torn write.
///
/// # Examples
///
/// ```no_run
/// use qsteer::adapters::MsgPackRepository;
/// use qsteer::ports::ModelRepository;
/// use qsteer::QLearner;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let mut learner = QLearner::default();
///
/// learner.save_to(&repo, Path::new("trained.msgpack"))?;
/// learner.load_from(&repo, Path::new("trained.msgpack"))?;
/// # Ok::<(), qsteer::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|source| Error::Io {
        operation: format!("write file {path:?}"),
        source,
    })?;
    let file = writer.into_inner().map_err(|e| Error::Io {
        operation: format!("flush file {path:?}"),
        source: e.into_error(),
    })?;
    file.sync_all().map_err(|source| Error::Io {
        operation: format!("sync file {path:?}"),
        source,
    })
}

impl ModelRepository for MsgPackRepository {
    fn save(&self, model: &SavedModel, path: &Path) -> Result<()> {
        let bytes = model.to_bytes()?;
        let staging = staging_path(path);

        if let Err(err) = write_file(&staging, &bytes) {
            // the staging file may not exist if create failed
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        fs::rename(&staging, path).map_err(|source| {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!(path = %staging.display(), error = %cleanup, "could not remove staging file");
            }
            Error::Io {
                operation: format!("rename {staging:?} to {path:?}"),
                source,
            }
        })
    }

    fn load(&self, path: &Path) -> Result<SavedModel> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        SavedModel::from_bytes(&bytes)
    }
}
