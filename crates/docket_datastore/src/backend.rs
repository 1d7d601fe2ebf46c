//! Traits the transaction adapter programs against.

use crate::error::{DatastoreError, DatastoreResult};
use crate::key::Key;
use crate::options::TransactionOptions;
use crate::Value;

/// Runs work closures inside datastore transactions.
///
/// # Invariants
///
/// - `f` receives a fresh transaction on every attempt
/// - if `f` fails, nothing it wrote is committed and its error is returned as-is
/// - if `f` succeeds, its writes are committed atomically or the attempt is
///   retried, up to `options.attempts` times (0 = store default)
/// - exhausting the attempts returns [`DatastoreError::ConcurrentTransaction`]
///
/// # Implementors
///
/// - [`crate::Datastore`] - in-memory optimistic store
pub trait TransactionRunner: Send + Sync {
    /// The transaction handle passed to work closures.
    type Transaction: TxWriter;

    /// Runs `f` in a transaction configured by `options`.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error, or the store's commit error converted into `E`.
    fn run_in_transaction<E, F>(&self, options: &TransactionOptions, f: F) -> Result<(), E>
    where
        F: FnMut(&mut Self::Transaction) -> Result<(), E>,
        E: From<DatastoreError>;
}

/// Write primitives of a datastore transaction.
pub trait TxWriter {
    /// Buffers a write of `value` under `key`.
    ///
    /// An incomplete key gets an allocated id. Returns the complete key.
    ///
    /// # Errors
    ///
    /// Fails on invalid keys, read-only transactions, entity-group limits
    /// and payloads that cannot be encoded.
    fn put(&mut self, key: &Key, value: &Value) -> DatastoreResult<Key>;

    /// Buffers a batch of writes, all or nothing.
    ///
    /// Returns the complete keys in input order.
    ///
    /// # Errors
    ///
    /// As [`TxWriter::put`], plus length mismatches and oversized batches.
    fn put_multi(&mut self, keys: &[Key], values: &[&Value]) -> DatastoreResult<Vec<Key>>;

    /// Buffers a write that must create a new entity.
    ///
    /// # Errors
    ///
    /// As [`TxWriter::put`], plus [`DatastoreError::AlreadyExists`] when a
    /// complete key is already taken.
    fn insert(&mut self, key: &Key, value: &Value) -> DatastoreResult<Key>;
}
