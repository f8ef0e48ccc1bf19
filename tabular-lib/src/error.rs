//! Error types

use crate::model::RowId;
use crate::source::SourceError;

/// Error type for structural table contract violations.
///
/// Selection correctness depends on identifier uniqueness, so duplicate
/// row ids and duplicate column keys fail fast when a snapshot is built
/// instead of being silently tolerated. "No results" conditions are never
/// errors; they render as an empty page.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    /// Two columns in one table definition share a key.
    #[error("duplicate column key '{key}' in table definition")]
    DuplicateColumnKey { key: String },

    /// Two rows in one snapshot share an identifier.
    #[error("duplicate row id '{id}' in snapshot")]
    DuplicateRowId { id: RowId },

    /// Loading a snapshot from a data source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl TableError {
    /// Creates a duplicate-column-key error.
    pub fn duplicate_column_key(key: impl Into<String>) -> Self {
        Self::DuplicateColumnKey { key: key.into() }
    }

    /// Creates a duplicate-row-id error.
    pub fn duplicate_row_id(id: impl Into<RowId>) -> Self {
        Self::DuplicateRowId { id: id.into() }
    }
}
