//! Database facade.

use crate::config::Config;
use crate::error::CoreError;
use crate::options::BoundOptions;
use crate::transaction::Transaction;
use docket_dal::{
    Database as DalDatabase, Error, ReadTransaction, ReadwriteTransaction, Result,
    TransactionOption, TransactionOptions,
};
use docket_datastore::TransactionRunner;
use tracing::{debug, warn};

/// The main database handle.
///
/// `Database` runs units of work against a datastore [`TransactionRunner`].
/// It provides:
/// - read-only transactions, whatever options the caller passes
/// - read-write transactions, refusing a read-only flag
/// - retries of the whole work function on commit conflicts, as decided by
///   the runner
///
/// The work function may run more than once, so it must not have side
/// effects outside the transaction it is given.
///
/// ```rust
/// use docket_core::Database;
/// use docket_dal::{ReadTransaction, TransactionOption};
/// use docket_datastore::Datastore;
///
/// let db = Database::new(Datastore::new());
/// db.run_readonly_transaction(&[TransactionOption::attempts(1)], |tx| {
///     assert!(tx.options().is_readonly());
///     Ok(())
/// })
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Database<R> {
    runner: R,
    config: Config,
}

impl<R: TransactionRunner> Database<R> {
    /// Creates a database over `runner` with the default configuration.
    pub fn new(runner: R) -> Self {
        Self::with_config(runner, Config::default())
    }

    /// Creates a database over `runner` with a custom configuration.
    pub fn with_config(runner: R, config: Config) -> Self {
        Self { runner, config }
    }

    /// Returns the underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs `f` in a read-only transaction.
    ///
    /// The read-only option is added to `options` before they are applied.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error unchanged, or the runner's failure.
    pub fn run_readonly_transaction<F>(&self, options: &[TransactionOption], mut f: F) -> Result<()>
    where
        F: FnMut(&dyn ReadTransaction) -> Result<()>,
    {
        let options = TransactionOptions::from_options(
            options.iter().copied().chain([TransactionOption::readonly()]),
        );
        self.run(&BoundOptions::new(options), |tx| f(&*tx))
    }

    /// Runs `f` in a read-write transaction.
    ///
    /// # Errors
    ///
    /// Fails without touching the datastore if `options` contain the
    /// read-only option. Otherwise returns `f`'s error unchanged, or the
    /// runner's failure.
    pub fn run_readwrite_transaction<F>(&self, options: &[TransactionOption], mut f: F) -> Result<()>
    where
        F: FnMut(&mut dyn ReadwriteTransaction) -> Result<()>,
    {
        let options = TransactionOptions::from_options(options.iter().copied());
        if options.is_readonly() {
            warn!("readwrite transaction requested with readonly option");
            return Err(Error::config_conflict(
                "asked to run readwrite transaction with readonly flag set",
            ));
        }
        self.run(&BoundOptions::new(options), |tx| f(tx))
    }

    fn run<F>(&self, options: &BoundOptions, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Transaction<'_, R>) -> Result<()>,
    {
        let mut attempt = 0u32;
        let result = self
            .runner
            .run_in_transaction(&options.native, |writer| -> std::result::Result<(), CoreError> {
                attempt += 1;
                debug!(
                    attempt,
                    readonly = options.options.is_readonly(),
                    cross_group = options.options.is_cross_group(),
                    "running transaction"
                );
                let mut tx = Transaction::new(self, options, writer);
                f(&mut tx)?;
                Ok(())
            });

        match &result {
            Ok(()) => debug!(attempts = attempt, "transaction committed"),
            Err(err) => debug!(attempts = attempt, error = %err, "transaction failed"),
        }
        result.map_err(Error::from)
    }
}

impl<R: TransactionRunner> DalDatabase for Database<R> {
    fn run_readonly_transaction<F>(&self, options: &[TransactionOption], f: F) -> Result<()>
    where
        F: FnMut(&dyn ReadTransaction) -> Result<()>,
    {
        Database::run_readonly_transaction(self, options, f)
    }

    fn run_readwrite_transaction<F>(&self, options: &[TransactionOption], f: F) -> Result<()>
    where
        F: FnMut(&mut dyn ReadwriteTransaction) -> Result<()>,
    {
        Database::run_readwrite_transaction(self, options, f)
    }
}
