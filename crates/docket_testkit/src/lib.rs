//! # Docket Testkit
//!
//! Test utilities for docket.
//!
//! This crate provides:
//! - [`RecordingRunner`], a [`TransactionRunner`](docket_datastore::TransactionRunner)
//!   fake that counts runs and attempts, records every write call and can
//!   inject failures and conflicts
//! - record and datastore fixtures
//! - property-based test generators using proptest
//! - test log initialisation
//!
//! ## Usage
//!
//! ```rust
//! use docket_testkit::prelude::*;
//! use docket_datastore::{TransactionOptions, TransactionRunner, TxWriter, Key, Value};
//!
//! let runner = RecordingRunner::new();
//! runner
//!     .run_in_transaction(&TransactionOptions::default(), |tx| {
//!         tx.put(&Key::new_incomplete("User", None), &Value::Null)?;
//!         Ok::<(), docket_datastore::DatastoreError>(())
//!     })
//!     .unwrap();
//! assert_eq!(runner.run_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use recording::*;
