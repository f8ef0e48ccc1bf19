//! The table engine facade

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::TableConfig;
use crate::dispatch::BulkActionDispatcher;
use crate::dispatch::BulkHandler;
use crate::dispatch::DispatchError;
use crate::error::TableError;
use crate::model::Column;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;
use crate::patch::PatchSet;
use crate::query;
use crate::query::Direction;
use crate::query::FilterPanel;
use crate::query::PredicateSet;
use crate::query::QueryState;
use crate::selection::SelectionModel;
use crate::source::Credential;
use crate::source::RowMapper;
use crate::source::RowSource;
use crate::store::RowStore;

/// Host callbacks fired on user-driven state changes.
///
/// All methods default to no-ops so hosts implement only what they
/// render. Bulk actions go through [`BulkHandler`] instead, since they
/// are requests rather than notifications.
pub trait TableEvents: Send {
    /// The selection changed; `selected` is sorted.
    fn on_selection_change(&mut self, _selected: &[RowId]) {}

    /// A column header was clicked.
    fn on_sort(&mut self, _column: &str, _direction: Direction) {}

    /// The current page changed.
    fn on_page_change(&mut self, _page: usize) {}

    /// Filter predicates were applied.
    fn on_filter_apply(&mut self, _filters: &PredicateSet) {}

    /// Filter predicates were reset.
    fn on_filter_reset(&mut self) {}
}

/// One rendered page of the visible set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// The rows on this page, in display order.
    pub rows: Vec<Row>,
    /// The effective (clamped) 1-based page.
    pub page: usize,
    /// Total pages over the visible set, minimum 1.
    pub total_pages: usize,
    /// Size of the visible set before slicing.
    pub total_items: usize,
}

/// Owns the full state of one table view and derives what to render.
///
/// The pipeline runs snapshot → search → filter predicates → stable sort
/// → pagination on every read, so derived views are always consistent
/// with the current [`QueryState`]. Selection is keyed by row identity
/// and therefore orthogonal to the pipeline; bulk actions act on the
/// whole selection, including rows scrolled out of view.
///
/// Each table instance owns its snapshot, query state, and selection;
/// nothing is shared between independent tables.
///
/// # Example
///
/// ```
/// use tabular_lib::engine::TableEngine;
/// use tabular_lib::model::{Column, Row};
/// use tabular_lib::TableConfig;
///
/// let mut table = TableEngine::with_rows(
///     vec![
///         Row::new(1).set("name", "Espresso machine").set("price", 249.99),
///         Row::new(2).set("name", "Coffee mug").set("price", 12.5),
///     ],
///     vec![Column::new("name", "Product"), Column::new("price", "Price")],
///     TableConfig::new(),
/// )?;
///
/// table.search("mug");
/// let page = table.page();
/// assert_eq!(page.rows.len(), 1);
/// # Ok::<(), tabular_lib::TableError>(())
/// ```
pub struct TableEngine {
    store: RowStore,
    config: TableConfig,
    query: QueryState,
    filters: FilterPanel,
    selection: SelectionModel,
    patches: PatchSet,
    dispatcher: Option<BulkActionDispatcher>,
    events: Option<Box<dyn TableEvents>>,
}

impl TableEngine {
    /// Creates an engine with no rows yet.
    pub fn new(columns: Vec<Column>, config: TableConfig) -> Result<Self, TableError> {
        Self::with_rows(Vec::new(), columns, config)
    }

    /// Creates an engine over an initial snapshot.
    pub fn with_rows(
        rows: Vec<Row>,
        columns: Vec<Column>,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        let store = RowStore::new(rows, columns)?;
        Ok(Self {
            store,
            config,
            query: QueryState::with_page_size(config.items_per_page),
            filters: FilterPanel::new(),
            selection: SelectionModel::new(),
            patches: PatchSet::new(),
            dispatcher: None,
            events: None,
        })
    }

    /// Installs the bulk-action handler.
    pub fn set_handler(&mut self, handler: Arc<dyn BulkHandler>) {
        self.dispatcher = Some(BulkActionDispatcher::new(handler));
    }

    /// Installs the host event sink.
    pub fn set_events(&mut self, events: Box<dyn TableEvents>) {
        self.events = Some(events);
    }

    /// Returns the column descriptors.
    pub fn columns(&self) -> &[Column] {
        self.store.columns()
    }

    /// Returns the table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the current query state.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Returns the filter panel.
    pub fn filters(&self) -> &FilterPanel {
        &self.filters
    }

    /// Returns `true` while a bulk action is in flight.
    pub fn is_busy(&self) -> bool {
        self.dispatcher
            .as_ref()
            .is_some_and(BulkActionDispatcher::is_busy)
    }

    // =========================================================================
    // Snapshot lifecycle
    // =========================================================================

    /// Replaces the snapshot with freshly loaded rows.
    ///
    /// A new snapshot invalidates the prior selection entirely, and
    /// reconciles optimistic patches against the authoritative rows.
    pub fn set_rows(&mut self, rows: Vec<Row>) -> Result<(), TableError> {
        let store = RowStore::new(rows, self.store.columns().to_vec())?;
        self.patches.reconcile(store.ids());
        self.store = store;
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify_selection();
        }
        Ok(())
    }

    /// Fetches a fresh snapshot through the host's data source.
    pub async fn load_from(
        &mut self,
        source: &dyn RowSource,
        credential: &Credential,
        mapper: &RowMapper,
    ) -> Result<(), TableError> {
        let response = source.fetch(credential).await?;
        let rows = mapper.normalize_response(response)?;
        self.set_rows(rows)
    }

    /// Stages an optimistic field patch for a row, keyed by identity.
    ///
    /// The patched value overlays reads until the next snapshot covers
    /// the row or the patch expires.
    pub fn stage_patch(&mut self, id: RowId, field: impl Into<String>, value: impl Into<Value>) {
        self.patches.stage(id, field, value);
    }

    // =========================================================================
    // Query transitions
    // =========================================================================

    /// Applies a search term; resets to page 1.
    pub fn search(&mut self, term: impl Into<String>) {
        if !self.config.searchable {
            return;
        }
        self.query = self.query.clone().with_search(term);
    }

    /// Handles a header click on `column`.
    ///
    /// Ignored when sorting is disabled or the column is not sortable;
    /// otherwise the already-sorted column toggles direction and a new
    /// column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        if !self.config.sortable {
            return;
        }
        if !self.store.column(column).is_some_and(Column::is_sortable) {
            return;
        }
        self.query = self.query.clone().with_sort_toggled(column);
        if let Some(events) = self.events.as_mut() {
            events.on_sort(column, self.query.sort_direction());
        }
    }

    /// Moves to `page`, clamped against the current visible set.
    pub fn set_page(&mut self, page: usize) {
        let plan = query::plan(
            self.visible_rows().len(),
            page,
            self.query.items_per_page(),
        );
        self.query = self.query.clone().with_page(plan.page);
        if let Some(events) = self.events.as_mut() {
            events.on_page_change(plan.page);
        }
    }

    /// Changes the page size without resetting the page.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.query = self.query.clone().with_items_per_page(items_per_page);
    }

    // =========================================================================
    // Filter panel
    // =========================================================================

    /// Drafts a filter from a raw form field; `{field}_min`/`{field}_max`
    /// names fold into range bounds, everything else is an exact match.
    pub fn stage_filter(&mut self, name: &str, value: impl Into<Value>) {
        self.filters.set_form_field(name, value);
    }

    /// Drafts an exact-day filter on a datetime field.
    pub fn stage_date_filter(&mut self, field: impl Into<String>, day: NaiveDate) {
        self.filters.set_date(field, day);
    }

    /// Removes a drafted filter.
    pub fn clear_filter(&mut self, field: &str) {
        self.filters.clear_field(field);
    }

    /// Applies the drafted filters; resets to page 1.
    pub fn apply_filters(&mut self) {
        self.filters.apply();
        self.query = self.query.clone().with_filters_changed();
        if let Some(events) = self.events.as_mut() {
            events.on_filter_apply(self.filters.applied());
        }
    }

    /// Clears drafted and applied filters; resets to page 1.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.query = self.query.clone().with_filters_changed();
        if let Some(events) = self.events.as_mut() {
            events.on_filter_reset();
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Returns the visible set: every row surviving search and filter
    /// predicates, in sorted order, before pagination slicing.
    pub fn visible_rows(&self) -> Vec<Row> {
        let rows = self.effective_rows();
        let term = if self.config.searchable {
            self.query.search_term()
        } else {
            ""
        };
        let matched = query::search_rows(&rows, term, self.store.columns());
        let matched = query::filter_rows(matched, self.filters.applied());
        let column = if self.config.sortable {
            self.query.sort_column()
        } else {
            None
        };
        let sorted = query::sort_rows(
            matched,
            column,
            self.query.sort_direction(),
            self.store.columns(),
        );
        sorted.into_iter().cloned().collect()
    }

    /// Returns the identifiers of the visible set, in display order.
    pub fn visible_ids(&self) -> Vec<RowId> {
        self.visible_rows()
            .iter()
            .map(|row| row.id().clone())
            .collect()
    }

    /// Returns the current page of the visible set.
    ///
    /// The requested page is clamped on every read, so a narrowing
    /// search or filter can never leave the view on an empty page.
    pub fn page(&self) -> PageView {
        let visible = self.visible_rows();
        let total_items = visible.len();
        if !self.config.pagination {
            return PageView {
                rows: visible,
                page: 1,
                total_pages: 1,
                total_items,
            };
        }
        let (rows, plan) = query::paginate(
            &visible,
            self.query.current_page(),
            self.query.items_per_page(),
        );
        PageView {
            rows,
            page: plan.page,
            total_pages: plan.total_pages,
            total_items,
        }
    }

    fn effective_rows(&self) -> Vec<Row> {
        if self.patches.is_empty() {
            return self.store.rows().to_vec();
        }
        self.store
            .rows()
            .iter()
            .map(|row| self.patches.overlay(row))
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles a single row's selection.
    pub fn select_row(&mut self, id: RowId, checked: bool) {
        if !self.config.selectable {
            return;
        }
        self.selection.select_one(id, checked);
        self.notify_selection();
    }

    /// Selects or deselects the whole visible set (the full filtered
    /// set, not just the current page).
    pub fn select_all_visible(&mut self, checked: bool) {
        if !self.config.selectable {
            return;
        }
        let visible = self.visible_ids();
        self.selection.select_all_visible(&visible, checked);
        self.notify_selection();
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Returns `true` iff every visible row is selected and the visible
    /// set is non-empty.
    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    /// Returns `true` iff some but not all visible rows are selected.
    pub fn is_indeterminate(&self) -> bool {
        self.selection.is_indeterminate(&self.visible_ids())
    }

    /// Returns the selected identifiers in a stable order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.ids()
    }

    // =========================================================================
    // Bulk actions
    // =========================================================================

    /// Runs `action` against the current selection.
    ///
    /// On success the selection is cleared unconditionally, so a
    /// completed action can never be re-applied by accident. On failure
    /// the error is surfaced and the selection is preserved for retry.
    /// An empty selection is a no-op.
    pub async fn run_bulk_action(&mut self, action: &str) -> Result<(), DispatchError> {
        let Some(dispatcher) = self.dispatcher.clone() else {
            return Err(DispatchError::NoHandler);
        };
        let ids = self.selection.ids();
        if ids.is_empty() {
            log::debug!("bulk action '{}' skipped: nothing selected", action);
            return Ok(());
        }
        dispatcher.dispatch(action, &ids).await?;
        self.selection.clear();
        self.notify_selection();
        Ok(())
    }

    fn notify_selection(&mut self) {
        let ids = self.selection.ids();
        if let Some(events) = self.events.as_mut() {
            events.on_selection_change(&ids);
        }
    }
}

impl std::fmt::Debug for TableEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("rows", &self.store.len())
            .field("query", &self.query)
            .field("selected", &self.selection.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("status", "Status"),
            Column::new("price", "Price"),
        ]
    }

    fn rows() -> Vec<Row> {
        (1..=6)
            .map(|i| {
                Row::new(i)
                    .set("name", format!("Product {i}"))
                    .set("status", if i % 2 == 0 { "active" } else { "draft" })
                    .set("price", (i * 10) as i64)
            })
            .collect()
    }

    #[test]
    fn test_search_respects_config() {
        let mut table = TableEngine::with_rows(
            rows(),
            columns(),
            TableConfig::new().searchable(false),
        )
        .unwrap();
        table.search("Product 1");
        assert_eq!(table.visible_rows().len(), 6);
    }

    #[test]
    fn test_sort_ignored_when_disabled() {
        let mut table =
            TableEngine::with_rows(rows(), columns(), TableConfig::new().sortable(false)).unwrap();
        table.toggle_sort("price");
        assert!(table.query().sort_column().is_none());
        assert_eq!(table.visible_ids()[0], 1.into());
    }

    #[test]
    fn test_selection_ignored_when_disabled() {
        let mut table = TableEngine::with_rows(
            rows(),
            columns(),
            TableConfig::new().selectable(false),
        )
        .unwrap();
        table.select_row(1.into(), true);
        assert!(table.selected_ids().is_empty());
    }

    #[test]
    fn test_pagination_disabled_returns_single_page() {
        let table = TableEngine::with_rows(
            rows(),
            columns(),
            TableConfig::new().pagination(false).items_per_page(2),
        )
        .unwrap();
        let page = table.page();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.rows.len(), 6);
    }

    #[test]
    fn test_new_snapshot_clears_selection() {
        let mut table = TableEngine::with_rows(rows(), columns(), TableConfig::new()).unwrap();
        table.select_row(2.into(), true);
        table.set_rows(rows()).unwrap();
        assert!(table.selected_ids().is_empty());
    }

    #[test]
    fn test_patch_overlays_until_reconciled() {
        let mut table = TableEngine::with_rows(rows(), columns(), TableConfig::new()).unwrap();
        table.stage_patch(1.into(), "status", "active");

        let patched = table
            .visible_rows()
            .into_iter()
            .find(|row| row.id() == &1.into())
            .unwrap();
        assert_eq!(patched.get("status"), Some(&Value::String("active".into())));

        // Authoritative reload says draft again.
        table.set_rows(rows()).unwrap();
        let reloaded = table
            .visible_rows()
            .into_iter()
            .find(|row| row.id() == &1.into())
            .unwrap();
        assert_eq!(reloaded.get("status"), Some(&Value::String("draft".into())));
    }

    #[test]
    fn test_filter_apply_resets_page() {
        let mut table = TableEngine::with_rows(
            rows(),
            columns(),
            TableConfig::new().items_per_page(2),
        )
        .unwrap();
        table.set_page(3);
        assert_eq!(table.page().page, 3);

        table.stage_filter("status", "active");
        table.apply_filters();
        assert_eq!(table.page().page, 1);
        assert_eq!(table.page().total_items, 3);
    }
}
