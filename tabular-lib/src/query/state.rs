//! Query state and its pure transitions

use super::Direction;

/// The user-driven view state of one table: search term, sort, and page.
///
/// Transitions are pure functions returning a new state, so every rule
/// (page resets on search changes, sort toggling, clamping) is unit
/// testable without a UI harness. The page resets to 1 whenever the
/// search term or a filter predicate changes; sort and page-size changes
/// never reset it on their own.
///
/// # Example
///
/// ```
/// use tabular_lib::query::{Direction, QueryState};
///
/// let state = QueryState::default()
///     .with_page(3)
///     .with_search("mug");
/// assert_eq!(state.current_page(), 1);
///
/// let state = state.with_sort_toggled("price");
/// assert_eq!(state.sort_column(), Some("price"));
/// assert_eq!(state.sort_direction(), Direction::Asc);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    search_term: String,
    sort_column: Option<String>,
    sort_direction: Direction,
    current_page: usize,
    items_per_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_column: None,
            sort_direction: Direction::Asc,
            current_page: 1,
            items_per_page: 10,
        }
    }
}

impl QueryState {
    /// Creates the default state with a specific page size.
    pub fn with_page_size(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            ..Self::default()
        }
    }

    /// Returns the current search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Returns the sorted column key, if any.
    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    /// Returns the sort direction.
    pub fn sort_direction(&self) -> Direction {
        self.sort_direction
    }

    /// Returns the requested 1-based page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the page size.
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Sets the search term and resets to page 1.
    pub fn with_search(self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            current_page: 1,
            ..self
        }
    }

    /// Resets to page 1; used when filter predicates change.
    pub fn with_filters_changed(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    /// Applies a header click: the already-sorted column toggles its
    /// direction, a new column starts ascending. The page is kept.
    pub fn with_sort_toggled(self, column: impl Into<String>) -> Self {
        let column = column.into();
        let direction = if self.sort_column.as_deref() == Some(column.as_str()) {
            self.sort_direction.toggled()
        } else {
            Direction::Asc
        };
        Self {
            sort_column: Some(column),
            sort_direction: direction,
            ..self
        }
    }

    /// Moves to the given page (floored at 1).
    pub fn with_page(self, page: usize) -> Self {
        Self {
            current_page: page.max(1),
            ..self
        }
    }

    /// Changes the page size (floored at 1) without resetting the page.
    pub fn with_items_per_page(self, items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            ..self
        }
    }
}
