//! Optimistic row patches

use std::collections::HashMap;
use std::collections::HashSet;
use std::time::Duration;
use std::time::Instant;

use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;

const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct Patch {
    fields: HashMap<String, Value>,
    staged_at: Instant,
}

/// Local optimistic field patches, keyed by row identifier.
///
/// When the host toggles a value (an order status, say) it stages a patch
/// and kicks off the backend write plus a reload; the patched value is
/// overlaid on reads until the authoritative row arrives. Reconciliation
/// is last-authoritative-wins: a new snapshot drops every patch whose row
/// it contains, whatever the fetched value says. If the reload fails the
/// patch stays visible until its TTL lapses, after which reads fall back
/// to the last authoritative value.
///
/// # Example
///
/// ```
/// use tabular_lib::model::Row;
/// use tabular_lib::patch::PatchSet;
///
/// let mut patches = PatchSet::new();
/// patches.stage(7.into(), "status", "shipped");
///
/// let row = Row::new(7).set("status", "pending");
/// let patched = patches.overlay(&row);
/// assert_eq!(patched.get("status").unwrap().as_str(), Some("shipped"));
/// ```
#[derive(Debug, Clone)]
pub struct PatchSet {
    patches: HashMap<RowId, Patch>,
    ttl: Duration,
}

impl Default for PatchSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchSet {
    /// Creates an empty patch set with the default 30 second TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates an empty patch set with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            patches: HashMap::new(),
            ttl,
        }
    }

    /// Stages a field patch for a row, merging with any fields already
    /// staged for it and restarting its TTL.
    pub fn stage(&mut self, id: RowId, field: impl Into<String>, value: impl Into<Value>) {
        let patch = self.patches.entry(id).or_insert_with(|| Patch {
            fields: HashMap::new(),
            staged_at: Instant::now(),
        });
        patch.fields.insert(field.into(), value.into());
        patch.staged_at = Instant::now();
    }

    /// Returns `true` if a live (non-expired) patch exists for the row.
    pub fn contains(&self, id: &RowId) -> bool {
        self.patches
            .get(id)
            .is_some_and(|patch| patch.staged_at.elapsed() < self.ttl)
    }

    /// Returns the row with any live patch applied on top.
    pub fn overlay(&self, row: &Row) -> Row {
        let Some(patch) = self.patches.get(row.id()) else {
            return row.clone();
        };
        if patch.staged_at.elapsed() >= self.ttl {
            return row.clone();
        }
        let mut patched = row.clone();
        for (field, value) in &patch.fields {
            patched.insert(field.clone(), value.clone());
        }
        patched
    }

    /// Drops every patch whose row appears in the authoritative snapshot
    /// (last-authoritative-wins), plus anything past its TTL.
    pub fn reconcile(&mut self, authoritative: &HashSet<RowId>) {
        let ttl = self.ttl;
        self.patches
            .retain(|id, patch| !authoritative.contains(id) && patch.staged_at.elapsed() < ttl);
    }

    /// Returns `true` if no patches are staged.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Returns the number of patched rows.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Discards all patches.
    pub fn clear(&mut self) {
        self.patches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_applies_staged_fields() {
        let mut patches = PatchSet::new();
        patches.stage(1.into(), "status", "cancelled");

        let row = Row::new(1).set("status", "pending").set("total", 42i64);
        let patched = patches.overlay(&row);
        assert_eq!(patched.get("status").unwrap().as_str(), Some("cancelled"));
        assert_eq!(patched.get("total"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_overlay_leaves_unpatched_rows_alone() {
        let mut patches = PatchSet::new();
        patches.stage(1.into(), "status", "cancelled");

        let row = Row::new(2).set("status", "pending");
        assert_eq!(patches.overlay(&row), row);
    }

    #[test]
    fn test_reconcile_drops_covered_patches() {
        let mut patches = PatchSet::new();
        patches.stage(1.into(), "status", "cancelled");
        patches.stage(2.into(), "status", "shipped");

        // The reload only returned row 1.
        let authoritative: HashSet<RowId> = [RowId::Int(1)].into_iter().collect();
        patches.reconcile(&authoritative);

        assert!(!patches.contains(&1.into()));
        assert!(patches.contains(&2.into()));
    }

    #[test]
    fn test_expired_patches_stop_applying() {
        let mut patches = PatchSet::with_ttl(Duration::ZERO);
        patches.stage(1.into(), "status", "cancelled");

        let row = Row::new(1).set("status", "pending");
        assert_eq!(
            patches.overlay(&row).get("status").unwrap().as_str(),
            Some("pending")
        );
        assert!(!patches.contains(&1.into()));
    }
}
