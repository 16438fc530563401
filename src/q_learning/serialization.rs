//! Persisted forms of Q-tables and learners.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{
        actions::ActionCatalog, discretizer::StateGrid, hyperparameters::Hyperparameters,
    },
    types::TableShape,
};

/// Raw table contents together with their declared shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub shape: TableShape,
    pub values: Vec<f64>,
}

impl TableSnapshot {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_msgpack(self, path.as_ref(), "Q-table")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_msgpack(path.as_ref(), "Q-table")
    }
}

/// A saved learner in one tagged record.
///
/// Carries the grid and action catalog the table was trained under, its
/// declared shape, its values and the hyperparameters. Written and read as a
/// single unit, so a table can never be restored with the hyperparameters of
/// another save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub version: u32,
    pub grid: StateGrid,
    pub actions: ActionCatalog,
    pub hyperparameters: Hyperparameters,
    pub table: TableSnapshot,
}

impl SavedModel {
    pub const VERSION: u32 = 1;

    pub fn new(
        grid: StateGrid,
        actions: ActionCatalog,
        hyperparameters: Hyperparameters,
        table: TableSnapshot,
    ) -> Self {
        Self {
            version: Self::VERSION,
            grid,
            actions,
            hyperparameters,
            table,
        }
    }

    pub fn shape(&self) -> TableShape {
        self.table.shape
    }

    /// Check the record is self-consistent and of a supported version.
    pub fn validate(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        let declared = TableShape {
            bins: self.grid.bins(),
            actions: self.actions.len(),
        };
        if self.table.shape != declared {
            return Err(Error::ShapeMismatch {
                expected: declared,
                found: self.table.shape,
            });
        }
        let expected = declared.cell_count()?;
        if self.table.values.len() != expected {
            return Err(Error::ValueCountMismatch {
                expected,
                got: self.table.values.len(),
            });
        }
        self.hyperparameters.validate()
    }

    /// Encode to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| Error::SerializationContext {
            operation: "serialize model to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize model from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

fn write_msgpack<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    rmp_serde::encode::write_named(&mut writer, value).map_err(|e| {
        Error::SerializationContext {
            operation: format!("serialize {what} to MessagePack"),
            message: e.to_string(),
        }
    })?;

    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush file {path:?}"),
        source,
    })
}

fn read_msgpack<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open file {path:?}"),
        source,
    })?;

    rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::SerializationContext {
        operation: format!("deserialize {what} from MessagePack"),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> SavedModel {
        let grid = StateGrid::new([2, 2, 1], [(0.0, 4.0), (0.0, 2.0), (0.0, 2.0)]).unwrap();
        let actions = ActionCatalog::new(vec![-10, 0, 10]).unwrap();
        let shape = TableShape {
            bins: [2, 2, 1],
            actions: 3,
        };
        let values = (0..shape.cell_count().unwrap()).map(|i| i as f64 / 10.0).collect();
        SavedModel::new(
            grid,
            actions,
            Hyperparameters::new(0.3, 0.8, 0.0).unwrap(),
            TableSnapshot { shape, values },
        )
    }

    #[test]
    fn test_bytes_roundtrip() {
        let model = sample_model();
        let bytes = model.to_bytes().unwrap();
        assert_eq!(SavedModel::from_bytes(&bytes).unwrap(), model);
    }

    #[test]
    fn test_validate_rejects_unknown_version() {
        let mut model = sample_model();
        model.version = 99;
        assert!(matches!(
            model.validate(),
            Err(Error::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inconsistent_value_count() {
        let mut model = sample_model();
        model.table.values.push(1.0);
        assert!(matches!(
            model.validate(),
            Err(Error::ValueCountMismatch {
                expected: 12,
                got: 13
            })
        ));
    }

    #[test]
    fn test_validate_rejects_shape_disagreeing_with_grid() {
        let mut model = sample_model();
        model.table.shape.actions = 4;
        assert!(matches!(
            model.validate(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unaddressable_table() {
        let grid = StateGrid::new([1 << 31, 1 << 31, 2], [(0.0, 1.0); 3]).unwrap();
        let actions = ActionCatalog::default();
        let shape = TableShape {
            bins: grid.bins(),
            actions: actions.len(),
        };
        let model = SavedModel::new(
            grid,
            actions,
            Hyperparameters::default(),
            TableSnapshot {
                shape,
                values: Vec::new(),
            },
        );
        assert!(matches!(
            model.validate(),
            Err(Error::TableTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_hyperparameters() {
        let mut model = sample_model();
        model.hyperparameters.discount_factor = 1.0;
        assert!(matches!(
            model.validate(),
            Err(Error::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_corrupt_bytes_fail() {
        let bytes = sample_model().to_bytes().unwrap();
        let result = SavedModel::from_bytes(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(Error::SerializationContext { .. })));
    }
}
