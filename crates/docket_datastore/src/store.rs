//! In-memory datastore with optimistic entity-group transactions.

use crate::backend::TransactionRunner;
use crate::codec;
use crate::config::DatastoreConfig;
use crate::error::{DatastoreError, DatastoreResult};
use crate::key::Key;
use crate::options::TransactionOptions;
use crate::stats::{DatastoreStats, StatsSnapshot};
use crate::transaction::{Transaction, TransactionParts};
use crate::Value;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// An in-memory entity-group datastore.
///
/// `Datastore` is a cheap handle; clones share the same entities.
///
/// Transactions are optimistic. Each one remembers the commit sequence it
/// started at, and its commit is rejected with
/// [`DatastoreError::ConcurrentTransaction`] if any entity group it touched
/// was committed to after that point. [`TransactionRunner::run_in_transaction`]
/// retries such commits.
#[derive(Clone)]
pub struct Datastore {
    shared: Arc<Shared>,
}

struct Shared {
    config: DatastoreConfig,
    state: RwLock<State>,
    next_id: AtomicI64,
    stats: DatastoreStats,
}

#[derive(Default)]
struct State {
    /// Committed entities: key -> encoded payload.
    entities: HashMap<Key, Vec<u8>>,
    /// Entity group root -> sequence of its last commit.
    group_versions: HashMap<Key, u64>,
    /// Sequence of the last commit.
    sequence: u64,
}

impl Datastore {
    /// Creates an empty datastore with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DatastoreConfig::default())
    }

    /// Creates an empty datastore.
    #[must_use]
    pub fn with_config(config: DatastoreConfig) -> Self {
        let first_id = config.first_allocated_id.max(1);
        Self {
            shared: Arc::new(Shared {
                config,
                state: RwLock::new(State::default()),
                next_id: AtomicI64::new(first_id),
                stats: DatastoreStats::default(),
            }),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DatastoreConfig {
        &self.shared.config
    }

    /// Reads the committed value stored under `key`.
    pub fn get(&self, key: &Key) -> DatastoreResult<Option<Value>> {
        self.get_as(key)
    }

    /// Reads the committed value stored under `key` as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &Key) -> DatastoreResult<Option<T>> {
        let state = self.shared.state.read();
        state
            .entities
            .get(key)
            .map(|bytes| codec::decode(bytes))
            .transpose()
    }

    /// Returns true if a committed entity exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.shared.state.read().entities.contains_key(key)
    }

    /// Returns the number of committed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.read().entities.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sequence number of the last commit.
    #[must_use]
    pub fn committed_sequence(&self) -> u64 {
        self.shared.state.read().sequence
    }

    /// Returns a snapshot of the transaction counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    pub(crate) fn allocate_id(&self) -> i64 {
        self.shared.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn read_committed(&self, key: &Key) -> Option<Vec<u8>> {
        self.shared.state.read().entities.get(key).cloned()
    }

    fn begin(&self, options: TransactionOptions) -> Transaction {
        let snapshot = self.shared.state.read().sequence;
        self.shared.stats.record_begin();
        Transaction::new(self.clone(), options, snapshot)
    }

    fn commit(&self, tx: Transaction) -> DatastoreResult<()> {
        let TransactionParts {
            snapshot,
            groups,
            writes,
        } = tx.into_parts();

        if writes.is_empty() {
            self.shared.stats.record_commit(0);
            return Ok(());
        }

        let mut state = self.shared.state.write();
        let stale = groups.iter().any(|group| {
            state
                .group_versions
                .get(group)
                .is_some_and(|&version| version > snapshot)
        });
        if stale {
            self.shared.stats.record_conflict();
            return Err(DatastoreError::ConcurrentTransaction);
        }

        state.sequence += 1;
        let sequence = state.sequence;
        let count = writes.len() as u64;
        for (key, payload) in writes {
            state.group_versions.insert(key.root().clone(), sequence);
            state.entities.insert(key, payload);
        }
        drop(state);

        self.shared.stats.record_commit(count);
        debug!(sequence, entities = count, "committed transaction");
        Ok(())
    }
}

impl Default for Datastore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionRunner for Datastore {
    type Transaction = Transaction;

    fn run_in_transaction<E, F>(&self, options: &TransactionOptions, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut Transaction) -> Result<(), E>,
        E: From<DatastoreError>,
    {
        let attempts = match options.attempts {
            0 => self.shared.config.default_attempts,
            n => n,
        }
        .max(1);

        for attempt in 1..=attempts {
            let mut tx = self.begin(*options);
            if let Err(err) = f(&mut tx) {
                self.shared.stats.record_rollback();
                debug!(attempt, "transaction work failed, rolling back");
                return Err(err);
            }
            match self.commit(tx) {
                Ok(()) => return Ok(()),
                Err(DatastoreError::ConcurrentTransaction) => {
                    warn!(attempt, attempts, "concurrent transaction, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(DatastoreError::ConcurrentTransaction.into())
    }
}

impl std::fmt::Debug for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datastore")
            .field("entities", &self.len())
            .field("committed_sequence", &self.committed_sequence())
            .finish_non_exhaustive()
    }
}
