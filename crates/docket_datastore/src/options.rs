//! Native transaction options.

/// Attempts made when a transaction does not ask for a specific number.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Options for a datastore transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionOptions {
    /// Allow the transaction to touch several entity groups.
    pub cross_group: bool,
    /// Number of attempts before giving up on conflicts (0 = store default).
    pub attempts: u32,
    /// Reject all writes.
    pub read_only: bool,
}
