//! Row selection

use std::collections::HashSet;

use crate::model::RowId;

/// Tracks selected row identifiers independently of filtering, sorting,
/// and pagination.
///
/// Selection is keyed by row identity, not position, so it survives
/// re-filtering and re-sorting. The aggregate state over a visible set is
/// ternary: none selected, some selected (indeterminate), all selected.
/// Every operation is synchronous and total; toggling an absent
/// identifier off is a no-op, not an error.
///
/// # Example
///
/// ```
/// use tabular_lib::selection::SelectionModel;
/// use tabular_lib::model::RowId;
///
/// let visible: Vec<RowId> = vec![1.into(), 2.into(), 3.into()];
/// let mut selection = SelectionModel::new();
/// selection.select_one(2.into(), true);
/// assert!(selection.is_indeterminate(&visible));
///
/// selection.select_all_visible(&visible, true);
/// assert!(selection.is_all_selected(&visible));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: HashSet<RowId>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes a single identifier.
    pub fn select_one(&mut self, id: RowId, checked: bool) {
        if checked {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Selects or deselects the whole visible set.
    ///
    /// When `checked`, every visible identifier is unioned into the
    /// selection. When unchecked, exactly the visible set is removed;
    /// selections outside that scope stay untouched.
    pub fn select_all_visible(&mut self, visible: &[RowId], checked: bool) {
        if checked {
            self.selected.extend(visible.iter().cloned());
        } else {
            for id in visible {
                self.selected.remove(id);
            }
        }
    }

    /// Returns `true` if the identifier is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` iff the visible set is non-empty and every visible
    /// identifier is selected.
    pub fn is_all_selected(&self, visible: &[RowId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id))
    }

    /// Returns `true` iff some but not all of the visible set is selected.
    pub fn is_indeterminate(&self, visible: &[RowId]) -> bool {
        let count = self.selected_visible_count(visible);
        count > 0 && count < visible.len()
    }

    /// Returns how many of the visible identifiers are selected.
    pub fn selected_visible_count(&self, visible: &[RowId]) -> usize {
        visible.iter().filter(|id| self.selected.contains(id)).count()
    }

    /// Drops every selected identifier not present in `valid`.
    ///
    /// Called when the snapshot changes so the selection never references
    /// stale or deleted rows.
    pub fn prune(&mut self, valid: &HashSet<RowId>) {
        self.selected.retain(|id| valid.contains(id));
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns the number of selected identifiers.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns the selected identifiers in a stable (sorted) order.
    pub fn ids(&self) -> Vec<RowId> {
        let mut ids: Vec<RowId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(ids: &[i64]) -> Vec<RowId> {
        ids.iter().map(|id| RowId::Int(*id)).collect()
    }

    #[test]
    fn test_select_one_toggles() {
        let mut selection = SelectionModel::new();
        selection.select_one(1.into(), true);
        assert!(selection.is_selected(&1.into()));
        selection.select_one(1.into(), false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_deselect_absent_id_is_noop() {
        let mut selection = SelectionModel::new();
        selection.select_one(9.into(), false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_aggregate_states_are_mutually_exclusive() {
        let visible = visible(&[1, 2, 3]);
        let mut selection = SelectionModel::new();

        assert!(!selection.is_all_selected(&visible));
        assert!(!selection.is_indeterminate(&visible));

        selection.select_one(1.into(), true);
        assert!(!selection.is_all_selected(&visible));
        assert!(selection.is_indeterminate(&visible));

        selection.select_all_visible(&visible, true);
        assert!(selection.is_all_selected(&visible));
        assert!(!selection.is_indeterminate(&visible));
    }

    #[test]
    fn test_all_selected_requires_non_empty_visible_set() {
        let selection = SelectionModel::new();
        assert!(!selection.is_all_selected(&[]));
    }

    #[test]
    fn test_deselect_all_leaves_out_of_scope_selection() {
        // Rows 4 and 5 were selected under an earlier filter.
        let mut selection = SelectionModel::new();
        selection.select_all_visible(&visible(&[1, 2, 4, 5]), true);

        selection.select_all_visible(&visible(&[1, 2]), false);
        assert_eq!(selection.ids(), visible(&[4, 5]));
    }

    #[test]
    fn test_prune_drops_stale_ids() {
        let mut selection = SelectionModel::new();
        selection.select_all_visible(&visible(&[1, 2, 3]), true);

        let remaining: HashSet<RowId> = visible(&[1, 3]).into_iter().collect();
        selection.prune(&remaining);
        assert_eq!(selection.ids(), visible(&[1, 3]));
    }

    #[test]
    fn test_ids_are_sorted() {
        let mut selection = SelectionModel::new();
        selection.select_one(3.into(), true);
        selection.select_one(1.into(), true);
        selection.select_one(2.into(), true);
        assert_eq!(selection.ids(), visible(&[1, 2, 3]));
    }
}
