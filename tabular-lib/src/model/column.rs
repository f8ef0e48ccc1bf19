//! Column descriptors

use super::Row;
use super::Value;

/// Describes one column of a table: which field it reads, how it is
/// labelled, and whether it participates in sorting and searching.
///
/// Sorting and searching always operate on the raw field value; the
/// optional `render` hook only affects what the host displays.
///
/// # Example
///
/// ```
/// use tabular_lib::model::Column;
///
/// let columns = vec![
///     Column::new("name", "Product"),
///     Column::new("price", "Price"),
///     Column::new("image_url", "Image").sortable(false).searchable(false),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    key: String,
    label: String,
    sortable: bool,
    searchable: bool,
    render: Option<fn(&Value, &Row) -> String>,
}

impl Column {
    /// Creates a column reading the field at `key`, sortable and
    /// searchable by default.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            searchable: true,
            render: None,
        }
    }

    /// Sets whether this column can be sorted.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether this column participates in free-text search.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Sets a display renderer for this column's cells.
    pub fn render(mut self, render: fn(&Value, &Row) -> String) -> Self {
        self.render = Some(render);
        self
    }

    /// Returns the field key (possibly a dot path) this column reads.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if the column can be sorted.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if the column participates in free-text search.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Renders the display value for a cell, falling back to the raw
    /// value's text when no renderer is set.
    pub fn display_value(&self, row: &Row) -> String {
        let value = row.value_at(&self.key).unwrap_or(Value::Null);
        match self.render {
            Some(render) => render(&value, row),
            None => value.search_text().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let col = Column::new("name", "Product");
        assert!(col.is_sortable());
        assert!(col.is_searchable());
    }

    #[test]
    fn test_display_value_uses_renderer() {
        fn money(value: &Value, _row: &Row) -> String {
            format!("${:.2}", value.as_f64().unwrap_or(0.0))
        }
        let col = Column::new("price", "Price").render(money);
        let row = Row::new(1).set("price", 19.5);
        assert_eq!(col.display_value(&row), "$19.50");
    }

    #[test]
    fn test_display_value_falls_back_to_raw_text() {
        let col = Column::new("name", "Product");
        let row = Row::new(1).set("name", "Mug");
        assert_eq!(col.display_value(&row), "Mug");
    }
}
