//! Error types for the qsteer crate

use thiserror::Error;

use crate::types::TableShape;

/// Main error type for the qsteer crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("dimension {dimension} has zero bins (every dimension needs at least one)")]
    InvalidBinCount { dimension: usize },

    #[error("dimension {dimension} has degenerate range [{low}, {high}] (need finite low < high)")]
    DegenerateRange { dimension: usize, low: f64, high: f64 },

    #[error("action catalog is empty")]
    EmptyActionCatalog,

    #[error("action {action} appears more than once in the catalog")]
    DuplicateAction { action: i32 },

    #[error("action {action} is not a member of the action catalog")]
    UnknownAction { action: i32 },

    #[error("invalid {name} {value} (expected {expected})")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("table of shape {shape} has more cells than can be addressed")]
    TableTooLarge { shape: TableShape },

    #[error("stored table shape {found} does not match live configuration {expected}")]
    ShapeMismatch {
        expected: TableShape,
        found: TableShape,
    },

    #[error("stored table holds {got} values, expected {expected}")]
    ValueCountMismatch { expected: usize, got: usize },

    #[error("saved model was trained under a different {part}")]
    IncompatibleModel { part: &'static str },

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
