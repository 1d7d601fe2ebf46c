//! # Docket DAL
//!
//! Store-agnostic data-access contract for docket.
//!
//! This crate defines what application code programs against:
//! - [`Key`] and [`KeyId`] for addressing records
//! - the [`Record`] capability trait and the stock [`DataRecord`]
//! - [`TransactionOptions`] built from [`TransactionOption`] values
//! - the [`Database`], [`ReadTransaction`] and [`ReadwriteTransaction`] traits
//! - the shared [`Error`] type, including the [`Error::NotSupported`] sentinel
//!
//! Store adapters (see `docket_core`) implement the traits; callers never
//! see a store's native key or option types.
//!
//! ## Usage
//!
//! ```
//! use docket_dal::{DataRecord, Key, Record, TransactionOption, TransactionOptions};
//!
//! let options = TransactionOptions::from_options([
//!     TransactionOption::cross_group(),
//!     TransactionOption::attempts(3),
//! ]);
//! assert!(options.is_cross_group());
//! assert!(!options.is_readonly());
//!
//! let record = DataRecord::new(Key::incomplete("users"), None);
//! assert!(!record.key().is_complete());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod db;
mod error;
mod key;
mod options;
mod record;
mod update;

pub use db::{Database, ReadTransaction, ReadwriteTransaction};
pub use error::{Error, Result, Source};
pub use key::{Key, KeyId};
pub use options::{IdGenerator, InsertOptions, TransactionOption, TransactionOptions};
pub use record::{DataRecord, Record};
pub use update::{Precondition, Update};

/// Opaque structured payload carried by a record.
pub type Data = ciborium::value::Value;
