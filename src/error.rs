use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::ColumnKind;

/// Errors surfaced by the data engine.
///
/// Only [`EngineError::UnreadableSource`] is fatal; the column errors mean a
/// single feature (chart, KPI, trend) is unavailable for the current table.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot read {}: {reason}", .path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("column '{0}' not found")]
    MissingRequiredColumn(String),

    #[error("column '{column}' is {found}, expected {expected}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
