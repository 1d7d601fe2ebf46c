//! Record and datastore fixtures.
//!
//! Provides convenience constructors for the records and stores most
//! tests start from.

use docket_dal::{Data, DataRecord, Key, KeyId};
use docket_datastore::{Datastore, DatastoreConfig};

/// Builds a small map payload `{"name": name}`.
pub fn named(name: &str) -> Data {
    Data::Map(vec![(Data::Text("name".into()), Data::Text(name.into()))])
}

/// A record with a complete key and a [`named`] payload.
pub fn complete_record(collection: &str, id: impl Into<KeyId>, name: &str) -> DataRecord {
    DataRecord::new(Key::new(collection, id), Some(named(name)))
}

/// A record with an incomplete key and a [`named`] payload.
pub fn incomplete_record(collection: &str, name: &str) -> DataRecord {
    DataRecord::new(Key::incomplete(collection), Some(named(name)))
}

/// A record with no payload.
pub fn empty_record(key: Key) -> DataRecord {
    DataRecord::new(key, None)
}

/// Runs `f` with a fresh in-memory datastore.
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&Datastore) -> R,
{
    let store = Datastore::new();
    f(&store)
}

/// Runs `f` with a fresh datastore built from `config`.
pub fn with_store_config<F, R>(config: DatastoreConfig, f: F) -> R
where
    F: FnOnce(&Datastore) -> R,
{
    let store = Datastore::with_config(config);
    f(&store)
}
