//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use docket_dal::{Data, DataRecord, Key, KeyId, TransactionOption};
use proptest::prelude::*;

/// Strategy for a single transaction option.
pub fn transaction_option_strategy() -> impl Strategy<Value = TransactionOption> {
    prop_oneof![
        Just(TransactionOption::Readonly),
        Just(TransactionOption::CrossGroup),
        (0u32..8).prop_map(TransactionOption::Attempts),
    ]
}

/// Strategy for a list of transaction options.
pub fn transaction_options_strategy() -> impl Strategy<Value = Vec<TransactionOption>> {
    prop::collection::vec(transaction_option_strategy(), 0..6)
}

/// Strategy for collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for valid key identifiers.
pub fn key_id_strategy() -> impl Strategy<Value = KeyId> {
    prop_oneof![
        (1i64..i64::MAX).prop_map(KeyId::Int),
        prop::string::string_regex("[A-Za-z0-9]{1,12}")
            .expect("Invalid regex")
            .prop_map(KeyId::Str),
    ]
}

/// Strategy for complete root keys.
pub fn complete_key_strategy() -> impl Strategy<Value = Key> {
    (collection_name_strategy(), key_id_strategy()).prop_map(|(collection, id)| Key::new(collection, id))
}

/// Strategy for valid keys: complete or incomplete, optionally under a complete parent.
pub fn key_strategy() -> impl Strategy<Value = Key> {
    (
        collection_name_strategy(),
        prop::option::of(key_id_strategy()),
        prop::option::of(complete_key_strategy()),
    )
        .prop_map(|(collection, id, parent)| Key {
            collection,
            id,
            parent: parent.map(Box::new),
        })
}

/// Strategy for simple record payloads.
pub fn data_strategy() -> impl Strategy<Value = Data> {
    prop_oneof![
        Just(Data::Null),
        any::<bool>().prop_map(Data::Bool),
        any::<i64>().prop_map(|n| Data::Integer(n.into())),
        "[a-z ]{0,16}".prop_map(Data::Text),
        prop::collection::vec(
            ("[a-z]{1,8}", any::<i32>()),
            1..4
        )
        .prop_map(|pairs| Data::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Data::Text(k), Data::Integer(v.into())))
                .collect()
        )),
    ]
}

/// Strategy for records with valid keys and payloads.
pub fn record_strategy() -> impl Strategy<Value = DataRecord> {
    (key_strategy(), data_strategy()).prop_map(|(key, data)| DataRecord::new(key, Some(data)))
}
