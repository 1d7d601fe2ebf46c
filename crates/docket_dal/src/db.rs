//! Database and transaction traits.

use crate::error::Result;
use crate::key::Key;
use crate::options::{InsertOptions, TransactionOption, TransactionOptions};
use crate::record::Record;
use crate::update::{Precondition, Update};

/// Operations available in every transaction.
pub trait ReadTransaction {
    /// Returns the options the transaction was created with.
    fn options(&self) -> &TransactionOptions;
}

/// Operations available in read-write transactions.
pub trait ReadwriteTransaction: ReadTransaction {
    /// Writes a record, overwriting any existing one with the same key.
    ///
    /// An incomplete key receives a store-assigned identifier, which is
    /// written back into the record.
    fn set(&mut self, record: &mut dyn Record) -> Result<()>;

    /// Writes several records in one batch.
    ///
    /// Records with incomplete keys receive store-assigned identifiers.
    /// The batch succeeds or fails as a whole.
    fn set_multi(&mut self, records: &mut [&mut dyn Record]) -> Result<()>;

    /// Creates a record that must not exist yet.
    fn insert(&mut self, record: &mut dyn Record, options: InsertOptions) -> Result<()>;

    /// Applies field-level updates to one record.
    fn update(
        &mut self,
        key: &Key,
        updates: &[Update],
        preconditions: &[Precondition],
    ) -> Result<()>;

    /// Applies field-level updates to several records.
    fn update_multi(
        &mut self,
        keys: &[Key],
        updates: &[Update],
        preconditions: &[Precondition],
    ) -> Result<()>;
}

/// Entry point for running units of work.
///
/// The work function may be called more than once if the store retries
/// the transaction, so it must not have side effects outside the
/// transaction it is given.
pub trait Database {
    /// Runs `f` in a read-only transaction.
    ///
    /// The read-only flag is forced on whatever `options` say.
    fn run_readonly_transaction<F>(&self, options: &[TransactionOption], f: F) -> Result<()>
    where
        F: FnMut(&dyn ReadTransaction) -> Result<()>;

    /// Runs `f` in a read-write transaction.
    ///
    /// Fails without calling `f` if `options` ask for a read-only transaction.
    fn run_readwrite_transaction<F>(&self, options: &[TransactionOption], f: F) -> Result<()>
    where
        F: FnMut(&mut dyn ReadwriteTransaction) -> Result<()>;
}
