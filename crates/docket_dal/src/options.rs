//! Transaction and insert options.

/// A single transaction option, combined into [`TransactionOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOption {
    /// Run the transaction read-only.
    Readonly,
    /// Allow the transaction to span several entity groups.
    CrossGroup,
    /// Maximum number of attempts the store may make.
    Attempts(u32),
}

impl TransactionOption {
    /// Requests a read-only transaction.
    #[must_use]
    pub const fn readonly() -> Self {
        Self::Readonly
    }

    /// Requests a cross-group transaction.
    #[must_use]
    pub const fn cross_group() -> Self {
        Self::CrossGroup
    }

    /// Caps the number of attempts. Zero leaves the choice to the store.
    #[must_use]
    pub const fn attempts(attempts: u32) -> Self {
        Self::Attempts(attempts)
    }
}

/// Store-agnostic transaction configuration.
///
/// Built once per transaction and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionOptions {
    readonly: bool,
    cross_group: bool,
    attempts: u32,
}

impl TransactionOptions {
    /// Creates options with every flag off and the store's default attempts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds individual options together. Later `Attempts` values win.
    pub fn from_options(options: impl IntoIterator<Item = TransactionOption>) -> Self {
        options
            .into_iter()
            .fold(Self::default(), |acc, option| match option {
                TransactionOption::Readonly => acc.with_readonly(true),
                TransactionOption::CrossGroup => acc.with_cross_group(true),
                TransactionOption::Attempts(n) => acc.with_attempts(n),
            })
    }

    /// Sets the read-only flag.
    #[must_use]
    pub const fn with_readonly(mut self, value: bool) -> Self {
        self.readonly = value;
        self
    }

    /// Sets the cross-group flag.
    #[must_use]
    pub const fn with_cross_group(mut self, value: bool) -> Self {
        self.cross_group = value;
        self
    }

    /// Sets the attempt count.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Returns true for read-only transactions.
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Returns true if the transaction may span entity groups.
    #[must_use]
    pub const fn is_cross_group(&self) -> bool {
        self.cross_group
    }

    /// Returns the maximum number of attempts (0 = store default).
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// How an insert picks an identifier for an incomplete key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdGenerator {
    /// Let the store allocate a numeric identifier.
    #[default]
    StoreAssigned,
    /// Random alphanumeric string of the given length.
    RandomString(usize),
    /// Random UUID (v4) rendered as a string.
    Uuid,
}

/// Options for [`ReadwriteTransaction::insert`](crate::ReadwriteTransaction::insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOptions {
    id_generator: IdGenerator,
}

impl InsertOptions {
    /// Creates insert options with store-assigned identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates random string identifiers of `len` characters.
    #[must_use]
    pub const fn with_random_string_id(mut self, len: usize) -> Self {
        self.id_generator = IdGenerator::RandomString(len);
        self
    }

    /// Generates UUID identifiers.
    #[must_use]
    pub const fn with_uuid_id(mut self) -> Self {
        self.id_generator = IdGenerator::Uuid;
        self
    }

    /// Returns the configured generator.
    #[must_use]
    pub const fn id_generator(&self) -> IdGenerator {
        self.id_generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_off() {
        let options = TransactionOptions::new();
        assert!(!options.is_readonly());
        assert!(!options.is_cross_group());
        assert_eq!(options.attempts(), 0);
    }

    #[test]
    fn from_options_combines_flags() {
        let options = TransactionOptions::from_options([
            TransactionOption::readonly(),
            TransactionOption::cross_group(),
            TransactionOption::attempts(4),
        ]);
        assert!(options.is_readonly());
        assert!(options.is_cross_group());
        assert_eq!(options.attempts(), 4);
    }

    #[test]
    fn last_attempts_wins() {
        let options = TransactionOptions::from_options([
            TransactionOption::attempts(2),
            TransactionOption::attempts(9),
        ]);
        assert_eq!(options.attempts(), 9);
    }

    #[test]
    fn insert_options_generators() {
        assert_eq!(InsertOptions::new().id_generator(), IdGenerator::StoreAssigned);
        assert_eq!(
            InsertOptions::new().with_random_string_id(5).id_generator(),
            IdGenerator::RandomString(5)
        );
        assert_eq!(InsertOptions::new().with_uuid_id().id_generator(), IdGenerator::Uuid);
    }

    fn option_strategy() -> impl Strategy<Value = TransactionOption> {
        prop_oneof![
            Just(TransactionOption::Readonly),
            Just(TransactionOption::CrossGroup),
            (0u32..10).prop_map(TransactionOption::Attempts),
        ]
    }

    proptest! {
        #[test]
        fn readonly_flag_reflects_presence(options in prop::collection::vec(option_strategy(), 0..6)) {
            let built = TransactionOptions::from_options(options.iter().copied());
            prop_assert_eq!(built.is_readonly(), options.contains(&TransactionOption::Readonly));
            prop_assert_eq!(built.is_cross_group(), options.contains(&TransactionOption::CrossGroup));
        }
    }
}
