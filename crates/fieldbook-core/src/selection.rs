//! In-memory record selection feeding bulk edit.
//!
//! A selection is a set of opaque record ids scoped to one viewing session,
//! never a set of copied record snapshots: the underlying records may change
//! without staleness here. Nothing is persisted.

use std::collections::HashSet;

/// Set of selected record ids.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<i64>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one record's membership.
    pub fn toggle(&mut self, id: i64) {
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
    }

    /// Select all of `ids` if not all are already selected, else clear.
    pub fn toggle_all(&mut self, ids: &[i64]) {
        if self.are_all_selected(ids) {
            self.clear();
        } else {
            self.select_all(ids);
        }
    }

    /// Replace the selection with exactly these ids.
    pub fn select_all(&mut self, ids: &[i64]) {
        self.selected = ids.iter().copied().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    /// True only if `ids` is non-empty and every id is selected.
    pub fn are_all_selected(&self, ids: &[i64]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Snapshot of the selected ids, in no particular order.
    pub fn ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
