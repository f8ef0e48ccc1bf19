//! Filter-panel predicates

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::sort::compare_values;
use crate::model::Row;
use crate::model::Value;

/// One filter-panel constraint on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match (select/text inputs).
    Equals(Value),
    /// Same calendar day as a datetime field.
    OnDate(NaiveDate),
    /// Inclusive range; each bound is independently optional.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
}

impl Predicate {
    /// Returns `true` if the row value satisfies this constraint.
    ///
    /// A missing or null field never satisfies a constraint on it.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return false;
        };
        match self {
            Predicate::Equals(expected) => values_equal(value, expected),
            Predicate::OnDate(day) => value
                .as_datetime()
                .is_some_and(|dt| dt.date_naive() == *day),
            Predicate::Range { min, max } => {
                let above_min = min
                    .as_ref()
                    .is_none_or(|m| compare_values(value, m) != std::cmp::Ordering::Less);
                let below_max = max
                    .as_ref()
                    .is_none_or(|m| compare_values(value, m) != std::cmp::Ordering::Greater);
                above_min && below_max
            }
        }
    }
}

/// Numeric variants compare numerically (so an `Int` filter value matches
/// a `Float` field); everything else requires exact equality.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// A named set of AND-combined constraints; absence of a field name
/// means no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    predicates: BTreeMap<String, Predicate>,
}

impl PredicateSet {
    /// Creates an empty predicate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no constraints are present.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns the constraint on a field, if any.
    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.predicates.get(field)
    }

    /// Sets the constraint on a field, replacing any existing one.
    pub fn insert(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(field.into(), predicate);
    }

    /// Removes the constraint on a field.
    pub fn remove(&mut self, field: &str) -> Option<Predicate> {
        self.predicates.remove(field)
    }

    /// Iterates over `(field, predicate)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the row satisfies every constraint.
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates
            .iter()
            .all(|(field, predicate)| predicate.matches(row.value_at(field).as_ref()))
    }
}

/// Returns the rows satisfying every predicate in the set.
///
/// An empty set is the identity. Runs after the free-text search and
/// before sorting in the pipeline.
pub fn filter_rows<'a>(rows: Vec<&'a Row>, predicates: &PredicateSet) -> Vec<&'a Row> {
    if predicates.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| predicates.matches(row))
        .collect()
}

/// Builds filter predicates behind an apply/reset panel.
///
/// Edits accumulate in a draft set that only takes effect once `apply`
/// promotes it to the applied set; `reset` discards both, so closing the
/// panel without applying never changes the visible rows.
///
/// # Example
///
/// ```
/// use tabular_lib::query::FilterPanel;
///
/// let mut panel = FilterPanel::new();
/// panel.set_equals("status", "active");
/// panel.set_min("price", 10i64);
/// assert!(panel.applied().is_empty());
///
/// panel.apply();
/// assert_eq!(panel.applied().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    draft: PredicateSet,
    applied: PredicateSet,
}

impl FilterPanel {
    /// Creates a panel with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the draft (unapplied) predicate set.
    pub fn draft(&self) -> &PredicateSet {
        &self.draft
    }

    /// Returns the applied predicate set.
    pub fn applied(&self) -> &PredicateSet {
        &self.applied
    }

    /// Drafts an exact-match constraint.
    pub fn set_equals(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.draft.insert(field, Predicate::Equals(value.into()));
    }

    /// Drafts an exact-day constraint on a datetime field.
    pub fn set_date(&mut self, field: impl Into<String>, day: NaiveDate) {
        self.draft.insert(field, Predicate::OnDate(day));
    }

    /// Drafts the lower bound of a range constraint, keeping any upper
    /// bound already drafted for the field.
    pub fn set_min(&mut self, field: impl Into<String>, min: impl Into<Value>) {
        let field = field.into();
        let max = match self.draft.get(&field) {
            Some(Predicate::Range { max, .. }) => max.clone(),
            _ => None,
        };
        self.draft.insert(
            field,
            Predicate::Range {
                min: Some(min.into()),
                max,
            },
        );
    }

    /// Drafts the upper bound of a range constraint, keeping any lower
    /// bound already drafted for the field.
    pub fn set_max(&mut self, field: impl Into<String>, max: impl Into<Value>) {
        let field = field.into();
        let min = match self.draft.get(&field) {
            Some(Predicate::Range { min, .. }) => min.clone(),
            _ => None,
        };
        self.draft.insert(
            field,
            Predicate::Range {
                min,
                max: Some(max.into()),
            },
        );
    }

    /// Drafts a constraint from a raw form field, folding the
    /// `{field}_min`/`{field}_max` naming convention into range bounds.
    pub fn set_form_field(&mut self, name: &str, value: impl Into<Value>) {
        if let Some(field) = name.strip_suffix("_min") {
            self.set_min(field.to_string(), value);
        } else if let Some(field) = name.strip_suffix("_max") {
            self.set_max(field.to_string(), value);
        } else {
            self.set_equals(name.to_string(), value);
        }
    }

    /// Removes the drafted constraint on a field.
    pub fn clear_field(&mut self, field: &str) {
        self.draft.remove(field);
    }

    /// Promotes the draft to the applied set and returns it.
    pub fn apply(&mut self) -> &PredicateSet {
        self.applied = self.draft.clone();
        &self.applied
    }

    /// Clears both the draft and the applied set.
    pub fn reset(&mut self) {
        self.draft = PredicateSet::new();
        self.applied = PredicateSet::new();
    }
}
