//! Stable row ordering

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Column;
use crate::model::Row;
use crate::model::Value;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Orders rows by one column's raw field values.
///
/// A `None` column, an unknown key, or a column marked `sortable: false`
/// preserves input order. The underlying pass is always an ascending
/// stable sort, so equal keys retain their relative input order;
/// descending is the exact reverse of that pass rather than a second
/// comparator, keeping tie-breaks consistent across both directions.
pub fn sort_rows<'a>(
    rows: Vec<&'a Row>,
    column: Option<&str>,
    direction: Direction,
    columns: &[Column],
) -> Vec<&'a Row> {
    let Some(key) = column else {
        return rows;
    };
    let Some(descriptor) = columns.iter().find(|c| c.key() == key) else {
        return rows;
    };
    if !descriptor.is_sortable() {
        return rows;
    }

    let mut keyed: Vec<(Option<Value>, &Row)> = rows
        .into_iter()
        .map(|row| (row.value_at(key), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref()));
    if direction == Direction::Desc {
        keyed.reverse();
    }
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Compares two sort keys; missing and null values order after every
/// present value in the ascending pass.
fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Total, consistent comparison over raw field values: numerics compare
/// numerically (across Int/Float/Decimal), datetimes chronologically,
/// booleans false-before-true, everything else as case-insensitive text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    if let (Some(a), Some(b)) = (a.as_datetime(), b.as_datetime()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_bool(), b.as_bool()) {
        return a.cmp(&b);
    }
    let a = a.search_text().unwrap_or_default().to_lowercase();
    let b = b.search_text().unwrap_or_default().to_lowercase();
    a.cmp(&b)
}
