//! Row store: the last-fetched snapshot of all rows.
//!
//! The store is replaced wholesale on every successful fetch; there is no
//! field-level diffing or incremental merge. Replacement swaps an `Arc`, so
//! a reader holding the previous snapshot keeps a consistent view and never
//! observes a half-written row.

use std::sync::Arc;

use crate::row::{Row, RowId};

/// Snapshot store of the remote row listing.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    snapshot: Arc<Vec<Row>>,
}

impl RowStore {
    /// Create an empty store. The store stays empty until the first
    /// successful fetch replaces it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally replace the snapshot with a freshly fetched listing.
    /// Server order is preserved as-is.
    pub fn replace(&mut self, rows: Vec<Row>) {
        self.snapshot = Arc::new(rows);
    }

    /// The latest snapshot. Cheap to clone; the returned `Arc` stays valid
    /// across later replacements.
    pub fn current(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.snapshot)
    }

    /// Look up a row by id in the current snapshot.
    pub fn find(&self, id: RowId) -> Option<&Row> {
        self.snapshot.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::sample_row;

    #[test]
    fn test_store_starts_empty() {
        let store = RowStore::new();
        assert!(store.is_empty());
        assert!(store.find(1).is_none());
    }

    #[test]
    fn test_replace_overwrites_snapshot() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1), sample_row(2)]);
        assert_eq!(store.len(), 2);

        store.replace(vec![sample_row(3)]);
        assert_eq!(store.len(), 1);
        assert!(store.find(1).is_none());
        assert!(store.find(3).is_some());
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_replace() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1)]);

        let held = store.current();
        store.replace(vec![sample_row(2), sample_row(3)]);

        // The held snapshot is unaffected by the replacement.
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_server_order_preserved() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(9), sample_row(2), sample_row(5)]);
        let ids: Vec<_> = store.current().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }
}
