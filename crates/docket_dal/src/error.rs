//! Error types for the data-access contract.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for data-access operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Underlying cause attached to a [`Error::Backend`] error.
///
/// Shared so that the same failure can be returned to the caller and
/// stored in a record's error slot.
#[derive(Clone)]
pub struct Source(Arc<dyn StdError + Send + Sync>);

impl Source {
    /// Returns the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for Source {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Errors surfaced through the data-access contract.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The adapter does not implement the requested operation.
    #[error("operation not supported")]
    NotSupported,

    /// Transaction options contradict the requested transaction kind.
    #[error("{message}")]
    ConfigConflict {
        /// Description of the conflict.
        message: String,
    },

    /// A key cannot be represented by the underlying store.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of the problem.
        message: String,
    },

    /// A record in a batch has no data to write.
    #[error("records[{index}].data() is None")]
    MissingData {
        /// Index of the offending record.
        index: usize,
    },

    /// An insert targeted a key that is already taken.
    #[error("record already exists: {key}")]
    AlreadyExists {
        /// The conflicting key, rendered by the store.
        key: String,
    },

    /// The underlying store failed.
    #[error("{context}: {source}")]
    Backend {
        /// What was being attempted.
        context: String,
        /// The store's error.
        source: Source,
    },
}

impl Error {
    /// Creates a configuration conflict error.
    pub fn config_conflict(message: impl Into<String>) -> Self {
        Self::ConfigConflict {
            message: message.into(),
        }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    /// Wraps a store error with context describing the failed operation.
    pub fn backend<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            context: context.into(),
            source: Source(Arc::new(source)),
        }
    }

    /// Returns true for the "operation not supported" sentinel.
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn backend_error_keeps_context_and_source() {
        let err = Error::backend(
            "failed to update /users,1",
            io::Error::other("disk on fire"),
        );
        assert_eq!(err.to_string(), "failed to update /users,1: disk on fire");

        let Error::Backend { source, .. } = &err else {
            panic!("expected Backend");
        };
        assert_eq!(source.inner().to_string(), "disk on fire");
    }

    #[test]
    fn cloned_error_shares_source() {
        let err = Error::backend("ctx", io::Error::other("boom"));
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }

    #[test]
    fn sentinel_detection() {
        assert!(Error::NotSupported.is_not_supported());
        assert!(!Error::invalid_key("x").is_not_supported());
    }

    #[test]
    fn missing_data_names_index() {
        assert_eq!(
            Error::MissingData { index: 3 }.to_string(),
            "records[3].data() is None"
        );
    }
}
