//! Transactions handed to work functions.

use crate::database::Database;
use crate::error::store_error;
use crate::keys::{assign_id, generate_id, resolve_key};
use crate::options::BoundOptions;
use docket_dal::{
    Data, Error, IdGenerator, InsertOptions, Key, Precondition, ReadTransaction,
    ReadwriteTransaction, Record, Result, TransactionOptions, Update,
};
use docket_datastore::{DatastoreError, TransactionRunner, TxWriter};
use std::fmt;
use tracing::debug;

/// A transaction in progress.
///
/// Binds the database it was started from, the options it was started
/// with and the datastore transaction of the current attempt. A new
/// `Transaction` is built for every attempt the runner makes.
pub struct Transaction<'a, R: TransactionRunner> {
    db: &'a Database<R>,
    options: &'a BoundOptions,
    writer: &'a mut R::Transaction,
}

impl<'a, R: TransactionRunner> Transaction<'a, R> {
    pub(crate) fn new(
        db: &'a Database<R>,
        options: &'a BoundOptions,
        writer: &'a mut R::Transaction,
    ) -> Self {
        Self { db, options, writer }
    }

    fn log_write(&self, op: &'static str, key: &Key, data: &Data) {
        if self.db.config().log_payloads {
            debug!(op, %key, ?data, "write");
        } else {
            debug!(op, %key, "write");
        }
    }

    /// Inserts `record` under its current key.
    fn insert_record(&mut self, record: &mut dyn Record) -> Result<()> {
        let Some(data) = record.data() else {
            missing_data(&*record)
        };
        let resolved = resolve_key(record.key())?;
        self.log_write("insert", record.key(), data);

        let key = resolved.native();
        let assigned = self
            .writer
            .insert(key, data)
            .map_err(|err| store_error(format!("failed to insert {key}"), err))?;
        if resolved.is_incomplete() {
            assign_id(record.key_mut(), &assigned);
        }
        Ok(())
    }

    /// Inserts `record` under generated ids until one is free.
    fn insert_generated(&mut self, record: &mut dyn Record, generator: IdGenerator) -> Result<()> {
        let attempts = self.db.config().generated_id_attempts.max(1);
        let mut last = None;

        for attempt in 1..=attempts {
            record.key_mut().id = generate_id(generator);
            match self.insert_record(record) {
                Ok(()) => return Ok(()),
                Err(err @ Error::AlreadyExists { .. }) => {
                    debug!(attempt, key = %record.key(), "generated id already taken");
                    last = Some(err);
                }
                Err(err) => {
                    record.key_mut().id = None;
                    return Err(err);
                }
            }
        }

        record.key_mut().id = None;
        Err(last.unwrap_or_else(|| Error::already_exists(record.key().to_string())))
    }
}

/// Aborts on a record without data. Writing nothing is a caller bug.
fn missing_data(record: &dyn Record) -> ! {
    panic!("record.data() is None for {}", record.key())
}

impl<R: TransactionRunner> fmt::Debug for Transaction<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("options", &self.options.options)
            .field("native", &self.options.native)
            .finish_non_exhaustive()
    }
}

impl<R: TransactionRunner> ReadTransaction for Transaction<'_, R> {
    fn options(&self) -> &TransactionOptions {
        &self.options.options
    }
}

impl<R: TransactionRunner> ReadwriteTransaction for Transaction<'_, R> {
    /// # Panics
    ///
    /// Panics if the record has no data.
    fn set(&mut self, record: &mut dyn Record) -> Result<()> {
        let Some(data) = record.data() else {
            missing_data(&*record)
        };
        let resolved = resolve_key(record.key())?;

        if resolved.is_incomplete() {
            debug!(key = %record.key(), "set with incomplete key, inserting");
            return self.insert_record(record);
        }

        self.log_write("put", record.key(), data);
        let key = resolved.native();
        self.writer
            .put(key, data)
            .map_err(|err| store_error(format!("failed to put {key}"), err))?;
        Ok(())
    }

    fn set_multi(&mut self, records: &mut [&mut dyn Record]) -> Result<()> {
        debug!(records = records.len(), "set_multi");
        if records.is_empty() {
            return Ok(());
        }

        let mut keys = Vec::with_capacity(records.len());
        let mut incomplete = Vec::new();
        for (i, record) in records.iter_mut().enumerate() {
            match resolve_key(record.key()) {
                Ok(resolved) => {
                    if resolved.is_incomplete() {
                        incomplete.push(i);
                    }
                    keys.push(resolved.into_native());
                }
                Err(err) => {
                    record.set_error(err.clone());
                    return Err(err);
                }
            }
        }

        if let Some(index) = records.iter().position(|record| record.data().is_none()) {
            let err = Error::MissingData { index };
            records[index].set_error(err.clone());
            return Err(err);
        }
        let values: Vec<&Data> = records.iter().filter_map(|record| record.data()).collect();
        if self.db.config().log_payloads {
            debug!(?values, "set_multi payloads");
        }

        let context = || format!("failed to put {} records", keys.len());
        let assigned = self
            .writer
            .put_multi(&keys, &values)
            .map_err(|err| store_error(context(), err))?;
        if assigned.len() != keys.len() {
            return Err(store_error(
                context(),
                DatastoreError::LengthMismatch {
                    keys: keys.len(),
                    values: assigned.len(),
                },
            ));
        }

        for i in incomplete {
            assign_id(records[i].key_mut(), &assigned[i]);
            debug!(index = i, key = %records[i].key(), "assigned id");
        }
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the record has no data.
    fn insert(&mut self, record: &mut dyn Record, options: InsertOptions) -> Result<()> {
        if record.data().is_none() {
            missing_data(&*record);
        }
        match options.id_generator() {
            _ if record.key().is_complete() => self.insert_record(record),
            IdGenerator::StoreAssigned => self.insert_record(record),
            generator => self.insert_generated(record, generator),
        }
    }

    fn update(&mut self, key: &Key, updates: &[Update], _preconditions: &[Precondition]) -> Result<()> {
        debug!(%key, updates = updates.len(), "update rejected");
        Err(Error::NotSupported)
    }

    fn update_multi(
        &mut self,
        keys: &[Key],
        updates: &[Update],
        _preconditions: &[Precondition],
    ) -> Result<()> {
        debug!(keys = keys.len(), updates = updates.len(), "update_multi rejected");
        Err(Error::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use docket_dal::{DataRecord, KeyId};
    use docket_datastore::Key as NativeKey;
    use docket_testkit::{complete_record, incomplete_record, named, RecordingRunner, WriteCall};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn db(runner: &RecordingRunner) -> Database<RecordingRunner> {
        Database::new(runner.clone())
    }

    #[test]
    fn set_complete_key_puts_once() {
        let runner = RecordingRunner::new();
        let mut record = complete_record("users", 7, "ada");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set(&mut record))
            .unwrap();

        assert_eq!(runner.calls(), vec![WriteCall::Put(NativeKey::new_id("users", 7, None))]);
        assert_eq!(record.key().id, Some(KeyId::Int(7)));
    }

    #[test]
    fn set_store_failure_names_the_key() {
        let runner = RecordingRunner::new().fail_writes_with(|| DatastoreError::codec("boom"));
        let mut record = complete_record("users", 7, "ada");

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set(&mut record))
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to put /users,7: codec error: boom");
        assert!(matches!(err, Error::Backend { .. }));
        assert!(record.error().is_none());
    }

    #[test]
    fn set_incomplete_key_inserts_and_writes_id_back() {
        let runner = RecordingRunner::new().with_first_id(55);
        let mut record = incomplete_record("users", "ada");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set(&mut record))
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![WriteCall::Insert(NativeKey::new_incomplete("users", None))]
        );
        assert_eq!(record.key().id, Some(KeyId::Int(55)));
    }

    #[test]
    fn set_without_data_panics_before_writing() {
        let runner = RecordingRunner::new();
        let mut record = DataRecord::new(Key::new("users", 1), None);

        let result = catch_unwind(AssertUnwindSafe(|| {
            db(&runner).run_readwrite_transaction(&[], |tx| tx.set(&mut record))
        }));

        assert!(result.is_err());
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn set_invalid_key_fails_without_writing() {
        let runner = RecordingRunner::new();
        let mut record = DataRecord::new(Key::new("users", 0), Some(named("ada")));

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set(&mut record))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidKey { .. }));
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn set_multi_mixed_keys_uses_one_batch() {
        let runner = RecordingRunner::new().with_first_id(100);
        let mut a = complete_record("users", 1, "ada");
        let mut b = incomplete_record("users", "bob");
        let mut c = complete_record("users", "carol", "carol");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set_multi(&mut [&mut a, &mut b, &mut c]))
            .unwrap();

        assert_eq!(
            runner.put_multi_calls(),
            vec![vec![
                NativeKey::new_id("users", 1, None),
                NativeKey::new_incomplete("users", None),
                NativeKey::new_name("users", "carol", None),
            ]]
        );
        assert_eq!(runner.write_call_count(), 1);
        assert_eq!(a.key().id, Some(KeyId::Int(1)));
        assert_eq!(b.key().id, Some(KeyId::Int(100)));
        assert_eq!(c.key().id, Some(KeyId::Str("carol".into())));
    }

    #[test]
    fn set_multi_empty_is_a_no_op() {
        let runner = RecordingRunner::new();
        db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set_multi(&mut []))
            .unwrap();
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn set_multi_missing_data_marks_record() {
        let runner = RecordingRunner::new();
        let mut a = complete_record("users", 1, "ada");
        let mut b = DataRecord::new(Key::new("users", 2), None);

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set_multi(&mut [&mut a, &mut b]))
            .unwrap_err();

        assert!(matches!(err, Error::MissingData { index: 1 }));
        assert!(matches!(b.error(), Some(Error::MissingData { index: 1 })));
        assert!(a.error().is_none());
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn set_multi_invalid_key_marks_record() {
        let runner = RecordingRunner::new();
        let mut a = DataRecord::new(Key::new("", 1), Some(named("ada")));

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set_multi(&mut [&mut a]))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidKey { .. }));
        assert!(matches!(a.error(), Some(Error::InvalidKey { .. })));
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn set_multi_store_failure_leaves_records_untouched() {
        let runner = RecordingRunner::new().fail_writes_with(|| DatastoreError::codec("boom"));
        let mut a = incomplete_record("users", "ada");

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.set_multi(&mut [&mut a]))
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to put 1 records: codec error: boom");
        assert!(!a.key().is_complete());
        assert!(a.error().is_none());
    }

    #[test]
    fn insert_with_store_assigned_id() {
        let runner = RecordingRunner::new().with_first_id(9);
        let mut record = incomplete_record("users", "ada");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.insert(&mut record, InsertOptions::new()))
            .unwrap();

        assert_eq!(record.key().id, Some(KeyId::Int(9)));
    }

    #[test]
    fn insert_with_generated_ids() {
        let runner = RecordingRunner::new();
        let mut a = incomplete_record("users", "ada");
        let mut b = incomplete_record("users", "bob");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| {
                tx.insert(&mut a, InsertOptions::new().with_random_string_id(16))?;
                tx.insert(&mut b, InsertOptions::new().with_uuid_id())
            })
            .unwrap();

        assert!(matches!(&a.key().id, Some(KeyId::Str(id)) if id.len() == 16));
        assert!(matches!(&b.key().id, Some(KeyId::Str(id)) if id.len() == 36));
        assert_eq!(runner.write_call_count(), 2);
    }

    #[test]
    fn insert_keeps_complete_keys() {
        let runner = RecordingRunner::new();
        let mut record = complete_record("users", "ada", "ada");

        db(&runner)
            .run_readwrite_transaction(&[], |tx| {
                tx.insert(&mut record, InsertOptions::new().with_uuid_id())
            })
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![WriteCall::Insert(NativeKey::new_name("users", "ada", None))]
        );
    }

    #[test]
    fn insert_existing_key_fails() {
        let runner = RecordingRunner::new().with_existing(NativeKey::new_id("users", 1, None));
        let mut record = complete_record("users", 1, "ada");

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.insert(&mut record, InsertOptions::new()))
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { key } if key == "/users,1"));
    }

    #[test]
    fn generated_id_attempts_are_bounded() {
        let runner = RecordingRunner::new().fail_writes_with(|| DatastoreError::AlreadyExists {
            key: NativeKey::new_name("users", "taken", None),
        });
        let database = Database::with_config(runner.clone(), Config::new().generated_id_attempts(3));
        let mut record = incomplete_record("users", "ada");

        let err = database
            .run_readwrite_transaction(&[], |tx| {
                tx.insert(&mut record, InsertOptions::new().with_uuid_id())
            })
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(runner.write_call_count(), 3);
        assert_eq!(record.key().id, None);
    }

    #[test]
    fn invalid_generated_id_resets_the_key() {
        let runner = RecordingRunner::new();
        let mut record = incomplete_record("users", "ada");

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| {
                tx.insert(&mut record, InsertOptions::new().with_random_string_id(0))
            })
            .unwrap_err();

        assert!(matches!(err, Error::InvalidKey { .. }));
        assert_eq!(record.key().id, None);
        assert_eq!(runner.write_call_count(), 0);
    }

    #[test]
    fn updates_are_not_supported() {
        let runner = RecordingRunner::new();
        let key = Key::new("users", 1);
        let updates = [Update::new("name", named("x"))];

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.update(&key, &updates, &[Precondition::Exists]))
            .unwrap_err();
        assert!(err.is_not_supported());

        let err = db(&runner)
            .run_readwrite_transaction(&[], |tx| tx.update_multi(&[key.clone()], &updates, &[]))
            .unwrap_err();
        assert!(err.is_not_supported());

        assert_eq!(runner.write_call_count(), 0);
    }
}
