//! A transaction runner that records what the adapter asks of it.

use docket_datastore::{
    DatastoreError, DatastoreResult, Key, TransactionOptions, TransactionRunner, TxWriter, Value,
    DEFAULT_ATTEMPTS,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// A write primitive invocation seen by [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    /// `put` with the key as passed in.
    Put(Key),
    /// `insert` with the key as passed in.
    Insert(Key),
    /// `put_multi` with the keys as passed in.
    PutMulti(Vec<Key>),
}

#[derive(Debug)]
struct Log {
    runs: usize,
    attempts: usize,
    options: Vec<TransactionOptions>,
    calls: Vec<WriteCall>,
    next_id: i64,
    conflicts_remaining: u32,
    fail_writes: Option<fn() -> DatastoreError>,
    existing: HashSet<Key>,
}

/// In-memory [`TransactionRunner`] fake.
///
/// Nothing is stored. Incomplete keys are completed with sequential ids
/// starting at 1000 (see [`RecordingRunner::with_first_id`]).
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    log: Arc<Mutex<Log>>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRunner {
    /// Creates a runner that succeeds at everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Log {
                runs: 0,
                attempts: 0,
                options: Vec::new(),
                calls: Vec::new(),
                next_id: 1000,
                conflicts_remaining: 0,
                fail_writes: None,
                existing: HashSet::new(),
            })),
        }
    }

    /// Sets the first id handed to incomplete keys.
    #[must_use]
    pub fn with_first_id(self, id: i64) -> Self {
        self.log.lock().next_id = id;
        self
    }

    /// Makes every write primitive fail with the error `make` builds.
    #[must_use]
    pub fn fail_writes_with(self, make: fn() -> DatastoreError) -> Self {
        self.log.lock().fail_writes = Some(make);
        self
    }

    /// Makes the next `n` commits report a concurrent transaction.
    #[must_use]
    pub fn with_conflicts(self, n: u32) -> Self {
        self.log.lock().conflicts_remaining = n;
        self
    }

    /// Marks `key` as already stored, so `insert` of it fails.
    #[must_use]
    pub fn with_existing(self, key: Key) -> Self {
        self.log.lock().existing.insert(key);
        self
    }

    /// Number of `run_in_transaction` calls.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.log.lock().runs
    }

    /// Number of work closure invocations across all runs.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.log.lock().attempts
    }

    /// Options passed to the most recent run.
    #[must_use]
    pub fn last_options(&self) -> Option<TransactionOptions> {
        self.log.lock().options.last().copied()
    }

    /// All write calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<WriteCall> {
        self.log.lock().calls.clone()
    }

    /// Keys of each `put_multi` call, in order.
    #[must_use]
    pub fn put_multi_calls(&self) -> Vec<Vec<Key>> {
        self.log
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                WriteCall::PutMulti(keys) => Some(keys.clone()),
                _ => None,
            })
            .collect()
    }

    /// Total number of write primitive calls.
    #[must_use]
    pub fn write_call_count(&self) -> usize {
        self.log.lock().calls.len()
    }
}

impl TransactionRunner for RecordingRunner {
    type Transaction = RecordingTransaction;

    fn run_in_transaction<E, F>(&self, options: &TransactionOptions, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut RecordingTransaction) -> Result<(), E>,
        E: From<DatastoreError>,
    {
        {
            let mut log = self.log.lock();
            log.runs += 1;
            log.options.push(*options);
        }
        let attempts = match options.attempts {
            0 => DEFAULT_ATTEMPTS,
            n => n,
        };

        for _ in 0..attempts {
            self.log.lock().attempts += 1;
            let mut tx = RecordingTransaction {
                log: Arc::clone(&self.log),
                options: *options,
            };
            f(&mut tx)?;

            let mut log = self.log.lock();
            if log.conflicts_remaining == 0 {
                return Ok(());
            }
            log.conflicts_remaining -= 1;
        }
        Err(DatastoreError::ConcurrentTransaction.into())
    }
}

/// Transaction handle of [`RecordingRunner`].
#[derive(Debug)]
pub struct RecordingTransaction {
    log: Arc<Mutex<Log>>,
    options: TransactionOptions,
}

impl RecordingTransaction {
    /// Options of the run this transaction belongs to.
    #[must_use]
    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    fn check(&self, log: &Log) -> DatastoreResult<()> {
        if self.options.read_only {
            return Err(DatastoreError::ReadOnlyTransaction);
        }
        match log.fail_writes {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

fn complete(log: &mut Log, key: &Key) -> Key {
    if key.is_incomplete() {
        let id = log.next_id;
        log.next_id += 1;
        Key::new_id(key.kind(), id, key.parent().cloned())
    } else {
        key.clone()
    }
}

impl TxWriter for RecordingTransaction {
    fn put(&mut self, key: &Key, _value: &Value) -> DatastoreResult<Key> {
        let mut log = self.log.lock();
        log.calls.push(WriteCall::Put(key.clone()));
        self.check(&log)?;
        Ok(complete(&mut log, key))
    }

    fn put_multi(&mut self, keys: &[Key], values: &[&Value]) -> DatastoreResult<Vec<Key>> {
        let mut log = self.log.lock();
        log.calls.push(WriteCall::PutMulti(keys.to_vec()));
        self.check(&log)?;
        if keys.len() != values.len() {
            return Err(DatastoreError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        Ok(keys.iter().map(|key| complete(&mut log, key)).collect())
    }

    fn insert(&mut self, key: &Key, _value: &Value) -> DatastoreResult<Key> {
        let mut log = self.log.lock();
        log.calls.push(WriteCall::Insert(key.clone()));
        self.check(&log)?;
        if log.existing.contains(key) {
            return Err(DatastoreError::AlreadyExists { key: key.clone() });
        }
        Ok(complete(&mut log, key))
    }
}
