//! Canonical row identity

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// The unique, stable identifier of a row.
///
/// Backends disagree on identifier shape (numeric ids, GUIDs, opaque
/// strings), so identity is normalized into this enum at the source
/// boundary. Selection, patches, and bulk actions are keyed by `RowId`,
/// never by row position, so they survive re-filtering and re-sorting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Numeric identifier.
    Int(i64),
    /// GUID/UUID identifier.
    Guid(Uuid),
    /// Opaque string identifier.
    Str(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(v) => write!(f, "{}", v),
            RowId::Guid(v) => write!(f, "{}", v),
            RowId::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RowId {
    fn from(v: i64) -> Self {
        RowId::Int(v)
    }
}

impl From<i32> for RowId {
    fn from(v: i32) -> Self {
        RowId::Int(v as i64)
    }
}

impl From<Uuid> for RowId {
    fn from(v: Uuid) -> Self {
        RowId::Guid(v)
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        RowId::Str(v)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        RowId::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(RowId::from(7).to_string(), "7");
        assert_eq!(RowId::from("sku-12").to_string(), "sku-12");
    }

    #[test]
    fn test_distinct_variants_never_collide() {
        assert_ne!(RowId::from(7), RowId::from("7"));
    }
}
