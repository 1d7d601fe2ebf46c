//! # Docket Core
//!
//! Transaction management for the docket data-access contract on top of the
//! entity-group datastore.
//!
//! This crate provides:
//! - [`Database`], the entry point with [`Database::run_readonly_transaction`]
//!   and [`Database::run_readwrite_transaction`]
//! - [`Transaction`], the handle work functions receive: single and batched
//!   writes, inserts, and explicit rejection of field-level updates
//! - [`resolve_key`], which renders contract keys as datastore keys and tells
//!   complete keys from incomplete ones
//! - [`translate_options`], the mapping from contract transaction options to
//!   datastore transaction options
//!
//! ## Example
//!
//! ```rust
//! use docket_core::Database;
//! use docket_dal::{Data, DataRecord, Key, ReadwriteTransaction, Record};
//! use docket_datastore::Datastore;
//!
//! let db = Database::new(Datastore::new());
//! let mut record = DataRecord::new(Key::incomplete("users"), Some(Data::Text("ada".into())));
//!
//! db.run_readwrite_transaction(&[], |tx| tx.set(&mut record)).unwrap();
//! assert!(record.key().is_complete());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod keys;
mod options;
mod transaction;

pub use config::Config;
pub use database::Database;
pub use error::{store_error, CoreError};
pub use keys::{assign_id, generate_id, resolve_key, ResolvedKey};
pub use options::{translate_options, BoundOptions};
pub use transaction::Transaction;

pub use docket_dal as dal;
pub use docket_datastore as datastore;
