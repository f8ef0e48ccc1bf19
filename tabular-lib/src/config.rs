//! Table configuration

/// Per-table feature switches, set once when the table is defined.
///
/// # Example
///
/// ```
/// use tabular_lib::TableConfig;
///
/// let config = TableConfig::new()
///     .items_per_page(25)
///     .selectable(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Whether the free-text search box is active.
    pub searchable: bool,
    /// Whether rows are sliced into pages.
    pub pagination: bool,
    /// Page size when pagination is active.
    pub items_per_page: usize,
    /// Whether rows can be selected.
    pub selectable: bool,
    /// Whether column headers sort.
    pub sortable: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            searchable: true,
            pagination: true,
            items_per_page: 10,
            selectable: true,
            sortable: true,
        }
    }
}

impl TableConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether free-text search is active.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Sets whether pagination is active.
    pub fn pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the page size (floored at 1).
    pub fn items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page.max(1);
        self
    }

    /// Sets whether rows can be selected.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Sets whether column headers sort.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }
}
