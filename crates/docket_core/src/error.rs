//! Error bridging between the datastore and the data-access contract.

use docket_dal::Error;
use docket_datastore::DatastoreError;
use thiserror::Error as ThisError;

/// Error type of work closures handed to the datastore runner.
///
/// The runner needs an error it can build from [`DatastoreError`] for
/// failed commits; work functions produce contract [`Error`]s. Both are
/// collapsed back into [`Error`] once the runner returns.
#[derive(Debug, ThisError)]
pub enum CoreError {
    /// Failure reported by the work function or the transaction.
    #[error(transparent)]
    Dal(#[from] Error),

    /// Failure reported by the datastore runner itself.
    #[error("transaction failed: {0}")]
    Store(#[from] DatastoreError),
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Dal(err) => err,
            CoreError::Store(err) => store_error("transaction failed", err),
        }
    }
}

/// Converts a datastore error into a contract error.
///
/// Key problems and insert collisions map onto their contract variants;
/// everything else is wrapped with `context`.
pub fn store_error(context: impl Into<String>, err: DatastoreError) -> Error {
    match err {
        DatastoreError::InvalidKey { message } => Error::invalid_key(message),
        DatastoreError::AlreadyExists { key } => Error::already_exists(key.to_string()),
        err => Error::backend(context, err),
    }
}
