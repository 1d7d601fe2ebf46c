//! Error types for datastore operations.

use crate::key::Key;
use thiserror::Error;

/// Result type for datastore operations.
pub type DatastoreResult<T> = Result<T, DatastoreError>;

/// Errors that can occur in datastore operations.
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// Another transaction committed to an entity group this one used.
    #[error("concurrent transaction")]
    ConcurrentTransaction,

    /// A write was attempted in a read-only transaction.
    #[error("cannot write in a read-only transaction")]
    ReadOnlyTransaction,

    /// The transaction touched more entity groups than allowed.
    #[error("transaction touches {groups} entity groups, limit is {limit}")]
    TooManyEntityGroups {
        /// Number of groups the transaction would touch.
        groups: usize,
        /// Allowed number of groups.
        limit: usize,
    },

    /// The key is not valid for this store.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of the problem.
        message: String,
    },

    /// An insert targeted an existing entity.
    #[error("entity already exists: {key}")]
    AlreadyExists {
        /// The existing key.
        key: Key,
    },

    /// Batched keys and values differ in length.
    #[error("{keys} keys but {values} values")]
    LengthMismatch {
        /// Number of keys.
        keys: usize,
        /// Number of values.
        values: usize,
    },

    /// A batch exceeds the configured size limit.
    #[error("batch of {size} entities exceeds the limit of {limit}")]
    BatchTooLarge {
        /// Size of the rejected batch.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A payload could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },
}

impl DatastoreError {
    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Returns true if retrying the whole transaction may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentTransaction)
    }
}
