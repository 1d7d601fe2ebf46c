//! # Docket Datastore
//!
//! Entity-group document store with retrying optimistic transactions.
//!
//! This crate is the native store that `docket_core` adapts to the
//! store-agnostic data-access contract. It mirrors the shape of a managed
//! entity-group datastore:
//!
//! - [`Key`]s are paths of `(kind, id-or-name)` segments; a key with
//!   neither id nor name is *incomplete* and receives an allocated id on write
//! - the root of a key's path is its entity group
//! - transactions are bounded in the number of entity groups they may touch,
//!   and may be read-only
//! - [`TransactionRunner::run_in_transaction`] retries the work closure
//!   when the commit detects a concurrent writer
//!
//! ## Example
//!
//! ```rust
//! use docket_datastore::{Datastore, DatastoreError, Key, TransactionOptions, TransactionRunner, TxWriter, Value};
//!
//! let store = Datastore::new();
//! let mut assigned = None;
//! store
//!     .run_in_transaction(&TransactionOptions::default(), |tx| -> Result<(), DatastoreError> {
//!         assigned = Some(tx.put(&Key::new_incomplete("users", None), &Value::Bool(true))?);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let key = assigned.unwrap();
//! assert!(!key.is_incomplete());
//! assert_eq!(store.get(&key).unwrap(), Some(Value::Bool(true)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod codec;
mod config;
mod error;
mod key;
mod options;
mod stats;
mod store;
mod transaction;

pub use backend::{TransactionRunner, TxWriter};
pub use config::DatastoreConfig;
pub use error::{DatastoreError, DatastoreResult};
pub use key::Key;
pub use options::{TransactionOptions, DEFAULT_ATTEMPTS};
pub use stats::StatsSnapshot;
pub use store::Datastore;
pub use transaction::Transaction;

/// Payload type stored by the datastore.
pub use ciborium::value::Value;
