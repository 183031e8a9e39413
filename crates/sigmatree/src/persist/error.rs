//! Persistence errors.

use crate::repr::TreeValidationError;

/// Errors raised while saving or loading a tree.
///
/// Line numbers are 1-based and count blank lines.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected {expected} comma-separated fields, found {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: cannot parse {field} from {value:?}")]
    Parse {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: leaf class must be at least 1")]
    InvalidLeafClass { line: usize },

    #[error("input ended with {missing} node(s) still expected")]
    Truncated { missing: usize },

    #[error("line {line}: unexpected data after the tree is complete")]
    TrailingData { line: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (this build reads {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("schema field {field} has {got} entries, expected {expected}")]
    SchemaLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("loaded tree is invalid: {0}")]
    Invalid(#[from] TreeValidationError),
}
