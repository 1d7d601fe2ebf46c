//! Datastore statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Transaction and write counters.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub(crate) struct DatastoreStats {
    transactions_started: AtomicU64,
    transactions_committed: AtomicU64,
    transactions_rolled_back: AtomicU64,
    conflicts: AtomicU64,
    entities_written: AtomicU64,
}

impl DatastoreStats {
    pub(crate) fn record_begin(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self, entities: u64) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        self.entities_written.fetch_add(entities, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            transactions_started: self.transactions_started.load(Ordering::Relaxed),
            transactions_committed: self.transactions_committed.load(Ordering::Relaxed),
            transactions_rolled_back: self.transactions_rolled_back.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            entities_written: self.entities_written.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the datastore counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Transactions begun, retries included.
    pub transactions_started: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Transactions abandoned because the work closure failed.
    pub transactions_rolled_back: u64,
    /// Commits rejected because of a concurrent writer.
    pub conflicts: u64,
    /// Entities written by committed transactions.
    pub entities_written: u64,
}
