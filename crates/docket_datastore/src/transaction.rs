//! Datastore transaction handle.

use crate::backend::TxWriter;
use crate::codec;
use crate::error::{DatastoreError, DatastoreResult};
use crate::key::Key;
use crate::options::TransactionOptions;
use crate::store::Datastore;
use crate::Value;
use std::collections::{HashMap, HashSet};

/// An active datastore transaction.
///
/// Writes are buffered and become visible only when the owning
/// [`TransactionRunner`](crate::TransactionRunner) commits. Every key the
/// transaction reads or writes adds its entity group to the transaction;
/// without `cross_group` only one group is allowed.
#[derive(Debug)]
pub struct Transaction {
    store: Datastore,
    options: TransactionOptions,
    /// Commit sequence observed at begin.
    snapshot: u64,
    /// Entity group roots touched so far.
    groups: HashSet<Key>,
    /// Pending writes: complete key -> encoded payload.
    writes: HashMap<Key, Vec<u8>>,
}

/// What a commit needs from a finished transaction.
pub(crate) struct TransactionParts {
    pub(crate) snapshot: u64,
    pub(crate) groups: HashSet<Key>,
    pub(crate) writes: HashMap<Key, Vec<u8>>,
}

impl Transaction {
    pub(crate) fn new(store: Datastore, options: TransactionOptions, snapshot: u64) -> Self {
        Self {
            store,
            options,
            snapshot,
            groups: HashSet::new(),
            writes: HashMap::new(),
        }
    }

    /// Returns the options the transaction runs with.
    #[must_use]
    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    /// Returns the number of buffered writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Returns the number of entity groups touched.
    #[must_use]
    pub fn entity_group_count(&self) -> usize {
        self.groups.len()
    }

    /// Reads `key`, seeing this transaction's own buffered writes.
    pub fn get(&mut self, key: &Key) -> DatastoreResult<Option<Value>> {
        if key.is_incomplete() {
            return Err(DatastoreError::invalid_key(format!("get of incomplete key {key}")));
        }
        key.validate().map_err(DatastoreError::invalid_key)?;
        self.admit_groups(std::slice::from_ref(key))?;

        if let Some(bytes) = self.writes.get(key) {
            return codec::decode(bytes).map(Some);
        }
        self.store
            .read_committed(key)
            .map(|bytes| codec::decode(&bytes))
            .transpose()
    }

    pub(crate) fn into_parts(self) -> TransactionParts {
        TransactionParts {
            snapshot: self.snapshot,
            groups: self.groups,
            writes: self.writes,
        }
    }

    fn ensure_writable(&self) -> DatastoreResult<()> {
        if self.options.read_only {
            Err(DatastoreError::ReadOnlyTransaction)
        } else {
            Ok(())
        }
    }

    fn group_limit(&self) -> usize {
        if self.options.cross_group {
            self.store.config().max_entity_groups
        } else {
            1
        }
    }

    /// Fails if `keys` would take the transaction past its group limit.
    ///
    /// Incomplete root keys each start a group of their own.
    fn check_groups(&self, keys: &[Key]) -> DatastoreResult<()> {
        let mut added: Vec<&Key> = Vec::new();
        let mut fresh = 0;
        for key in keys {
            if key.is_incomplete() && key.parent().is_none() {
                fresh += 1;
                continue;
            }
            let root = key.root();
            if !self.groups.contains(root) && !added.contains(&root) {
                added.push(root);
            }
        }

        let total = self.groups.len() + added.len() + fresh;
        let limit = self.group_limit();
        if total > limit {
            return Err(DatastoreError::TooManyEntityGroups {
                groups: total,
                limit,
            });
        }
        Ok(())
    }

    /// Adds the groups of `keys`, failing without change if the limit is exceeded.
    fn admit_groups(&mut self, keys: &[Key]) -> DatastoreResult<()> {
        self.check_groups(keys)?;
        let roots: Vec<Key> = keys.iter().map(|key| key.root().clone()).collect();
        self.groups.extend(roots);
        Ok(())
    }

    /// Fills in an id for an incomplete key.
    ///
    /// Ids taken by stored entities, pending writes or `reserved` keys are
    /// skipped.
    fn complete(&self, key: &Key, reserved: &[Key]) -> Key {
        if !key.is_incomplete() {
            return key.clone();
        }
        loop {
            let candidate = key.complete_with(self.store.allocate_id());
            let taken = self.writes.contains_key(&candidate)
                || reserved.contains(&candidate)
                || self.store.contains(&candidate);
            if !taken {
                return candidate;
            }
        }
    }
}

impl TxWriter for Transaction {
    fn put(&mut self, key: &Key, value: &Value) -> DatastoreResult<Key> {
        self.ensure_writable()?;
        key.validate().map_err(DatastoreError::invalid_key)?;
        let payload = codec::encode(value)?;

        self.check_groups(std::slice::from_ref(key))?;
        let key = self.complete(key, &[]);
        self.admit_groups(std::slice::from_ref(&key))?;
        self.writes.insert(key.clone(), payload);
        Ok(key)
    }

    fn put_multi(&mut self, keys: &[Key], values: &[&Value]) -> DatastoreResult<Vec<Key>> {
        self.ensure_writable()?;
        if keys.len() != values.len() {
            return Err(DatastoreError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let limit = self.store.config().max_batch_size;
        if keys.len() > limit {
            return Err(DatastoreError::BatchTooLarge {
                size: keys.len(),
                limit,
            });
        }
        for key in keys {
            key.validate().map_err(DatastoreError::invalid_key)?;
        }
        let payloads = values
            .iter()
            .map(|value| codec::encode(value))
            .collect::<DatastoreResult<Vec<_>>>()?;

        self.check_groups(keys)?;
        let completed: Vec<Key> = keys.iter().map(|key| self.complete(key, keys)).collect();
        self.admit_groups(&completed)?;
        for (key, payload) in completed.iter().zip(payloads) {
            self.writes.insert(key.clone(), payload);
        }
        Ok(completed)
    }

    fn insert(&mut self, key: &Key, value: &Value) -> DatastoreResult<Key> {
        self.ensure_writable()?;
        if !key.is_incomplete() {
            key.validate().map_err(DatastoreError::invalid_key)?;
            self.admit_groups(std::slice::from_ref(key))?;
            if self.writes.contains_key(key) || self.store.read_committed(key).is_some() {
                return Err(DatastoreError::AlreadyExists { key: key.clone() });
            }
        }
        self.put(key, value)
    }
}
