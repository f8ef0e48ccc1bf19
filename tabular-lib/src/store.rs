//! Validated row snapshots

use std::collections::HashSet;

use crate::error::TableError;
use crate::model::Column;
use crate::model::Row;
use crate::model::RowId;

/// An immutable, validated snapshot of the rows and columns backing one
/// table view.
///
/// Construction fails fast on duplicate column keys or duplicate row
/// identifiers; everything downstream (search, sort, selection, bulk
/// actions) assumes both are unique. A fresh backend fetch produces a
/// whole new store rather than mutating an existing one.
///
/// # Example
///
/// ```
/// use tabular_lib::model::{Column, Row};
/// use tabular_lib::store::RowStore;
///
/// let store = RowStore::new(
///     vec![Row::new(1).set("name", "Mug"), Row::new(2).set("name", "Kettle")],
///     vec![Column::new("name", "Product")],
/// )?;
/// assert_eq!(store.len(), 2);
/// # Ok::<(), tabular_lib::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RowStore {
    rows: Vec<Row>,
    columns: Vec<Column>,
    ids: HashSet<RowId>,
}

impl RowStore {
    /// Creates a validated snapshot from rows and column descriptors.
    pub fn new(rows: Vec<Row>, columns: Vec<Column>) -> Result<Self, TableError> {
        let mut keys = HashSet::new();
        for column in &columns {
            if !keys.insert(column.key().to_string()) {
                return Err(TableError::duplicate_column_key(column.key()));
            }
        }

        let mut ids = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !ids.insert(row.id().clone()) {
                return Err(TableError::DuplicateRowId {
                    id: row.id().clone(),
                });
            }
        }

        Ok(Self { rows, columns, ids })
    }

    /// Creates an empty snapshot with the given columns.
    pub fn empty(columns: Vec<Column>) -> Result<Self, TableError> {
        Self::new(Vec::new(), columns)
    }

    /// Returns all rows in snapshot order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the column descriptors.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if a row with the given identifier exists.
    pub fn contains_id(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Returns the set of all row identifiers.
    pub fn ids(&self) -> &HashSet<RowId> {
        &self.ids
    }

    /// Returns the row with the given identifier, if present.
    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Returns the column with the given key, if present.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_column_keys() {
        let result = RowStore::new(
            Vec::new(),
            vec![Column::new("name", "Name"), Column::new("name", "Also name")],
        );
        assert!(matches!(
            result,
            Err(TableError::DuplicateColumnKey { key }) if key == "name"
        ));
    }

    #[test]
    fn test_rejects_duplicate_row_ids() {
        let result = RowStore::new(
            vec![Row::new(1), Row::new(1)],
            vec![Column::new("name", "Name")],
        );
        assert!(matches!(result, Err(TableError::DuplicateRowId { .. })));
    }

    #[test]
    fn test_lookup_by_id_and_key() {
        let store = RowStore::new(
            vec![Row::new(1).set("name", "Mug")],
            vec![Column::new("name", "Name")],
        )
        .unwrap();
        assert!(store.contains_id(&1.into()));
        assert!(store.row(&1.into()).is_some());
        assert!(store.row(&2.into()).is_none());
        assert_eq!(store.column("name").map(|c| c.label()), Some("Name"));
    }
}
