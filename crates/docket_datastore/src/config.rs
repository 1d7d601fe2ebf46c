//! Datastore configuration.

use crate::options::DEFAULT_ATTEMPTS;

/// Configuration for a [`Datastore`](crate::Datastore).
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Attempts used when a transaction leaves `attempts` at zero.
    pub default_attempts: u32,

    /// Entity groups a cross-group transaction may touch.
    pub max_entity_groups: usize,

    /// Maximum entities in one `put_multi` call.
    pub max_batch_size: usize,

    /// First numeric id handed out for incomplete keys.
    pub first_allocated_id: i64,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            default_attempts: DEFAULT_ATTEMPTS,
            max_entity_groups: 25,
            max_batch_size: 500,
            first_allocated_id: 1,
        }
    }
}

impl DatastoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default attempt count.
    #[must_use]
    pub const fn default_attempts(mut self, attempts: u32) -> Self {
        self.default_attempts = attempts;
        self
    }

    /// Sets the cross-group entity group limit.
    #[must_use]
    pub const fn max_entity_groups(mut self, limit: usize) -> Self {
        self.max_entity_groups = limit;
        self
    }

    /// Sets the batch size limit.
    #[must_use]
    pub const fn max_batch_size(mut self, limit: usize) -> Self {
        self.max_batch_size = limit;
        self
    }

    /// Sets the first allocated id.
    #[must_use]
    pub const fn first_allocated_id(mut self, id: i64) -> Self {
        self.first_allocated_id = id;
        self
    }
}
