//! Transaction options translation.

use docket_dal::TransactionOptions;
use docket_datastore::TransactionOptions as NativeOptions;

/// Maps contract options onto datastore options.
///
/// Pure and total: every flag is copied across, nothing is validated.
#[must_use]
pub fn translate_options(options: &TransactionOptions) -> NativeOptions {
    NativeOptions {
        cross_group: options.is_cross_group(),
        attempts: options.attempts(),
        read_only: options.is_readonly(),
    }
}

/// Contract options together with their datastore translation.
///
/// Derived once when a transaction is created and shared by every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundOptions {
    /// Options as the caller expressed them.
    pub options: TransactionOptions,
    /// Options handed to the datastore runner.
    pub native: NativeOptions,
}

impl BoundOptions {
    /// Binds `options` to their translation.
    #[must_use]
    pub fn new(options: TransactionOptions) -> Self {
        Self {
            native: translate_options(&options),
            options,
        }
    }
}
