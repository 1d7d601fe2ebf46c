//! Key resolution between the contract and the datastore.

use docket_dal::{Error, IdGenerator, Key, KeyId, Result};
use docket_datastore::Key as NativeKey;
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

/// A contract key rendered as a datastore key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKey {
    /// The key carries an identifier.
    Complete(NativeKey),
    /// The key has no identifier; the store will allocate one.
    Incomplete(NativeKey),
}

impl ResolvedKey {
    /// Returns `true` if the store must allocate an identifier.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }

    /// Returns the datastore key.
    #[must_use]
    pub fn native(&self) -> &NativeKey {
        match self {
            Self::Complete(key) | Self::Incomplete(key) => key,
        }
    }

    /// Consumes `self`, returning the datastore key.
    #[must_use]
    pub fn into_native(self) -> NativeKey {
        match self {
            Self::Complete(key) | Self::Incomplete(key) => key,
        }
    }
}

/// Renders `key` and its ancestors as a datastore key.
///
/// Ancestors must be complete. Integer ids must be positive and string ids
/// non-empty, since the store treats zero and `""` as "no identifier".
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] for keys the store cannot represent.
pub fn resolve_key(key: &Key) -> Result<ResolvedKey> {
    let parent = match key.parent() {
        None => None,
        Some(parent) => match resolve_key(parent)? {
            ResolvedKey::Complete(native) => Some(native),
            ResolvedKey::Incomplete(_) => {
                return Err(Error::invalid_key(format!("{key} has incomplete parent {parent}")));
            }
        },
    };

    if key.collection.is_empty() {
        return Err(Error::invalid_key(format!("{key} has an empty collection")));
    }

    let native = match &key.id {
        None => {
            return Ok(ResolvedKey::Incomplete(NativeKey::new_incomplete(
                key.collection.as_str(),
                parent,
            )));
        }
        Some(KeyId::Int(id)) if *id > 0 => NativeKey::new_id(key.collection.as_str(), *id, parent),
        Some(KeyId::Int(id)) => {
            return Err(Error::invalid_key(format!("{key} has non-positive id {id}")));
        }
        Some(KeyId::Str(name)) if !name.is_empty() => {
            NativeKey::new_name(key.collection.as_str(), name.as_str(), parent)
        }
        Some(KeyId::Str(_)) => {
            return Err(Error::invalid_key(format!("{key} has an empty string id")));
        }
    };
    Ok(ResolvedKey::Complete(native))
}

/// Copies the identifier the store assigned into `key`.
pub fn assign_id(key: &mut Key, native: &NativeKey) {
    key.id = Some(match native.name() {
        "" => KeyId::Int(native.id()),
        name => KeyId::Str(name.to_owned()),
    });
}

/// Produces a fresh identifier for `generator`.
///
/// Returns `None` for [`IdGenerator::StoreAssigned`].
#[must_use]
pub fn generate_id(generator: IdGenerator) -> Option<KeyId> {
    match generator {
        IdGenerator::StoreAssigned => None,
        IdGenerator::RandomString(len) => Some(KeyId::Str(
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect(),
        )),
        IdGenerator::Uuid => Some(KeyId::Str(Uuid::new_v4().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_testkit::complete_key_strategy;
    use proptest::prelude::*;

    #[test]
    fn complete_int_key() {
        let resolved = resolve_key(&Key::new("users", 7)).unwrap();
        assert_eq!(resolved, ResolvedKey::Complete(NativeKey::new_id("users", 7, None)));
        assert!(!resolved.is_incomplete());
    }

    #[test]
    fn complete_string_key_with_parent() {
        let key = Key::new("posts", "hello").with_parent(Key::new("users", 7));
        let resolved = resolve_key(&key).unwrap();
        let parent = NativeKey::new_id("users", 7, None);
        assert_eq!(resolved.native(), &NativeKey::new_name("posts", "hello", Some(parent)));
    }

    #[test]
    fn incomplete_key_keeps_parent() {
        let key = Key::incomplete("posts").with_parent(Key::new("users", 7));
        let resolved = resolve_key(&key).unwrap();
        assert!(resolved.is_incomplete());
        assert!(resolved.native().is_incomplete());
        assert_eq!(resolved.native().parent(), Some(&NativeKey::new_id("users", 7, None)));
    }

    #[test]
    fn unrepresentable_keys_are_rejected() {
        let bad = [
            Key::new("", 1),
            Key::new("users", 0),
            Key::new("users", -4),
            Key::new("users", ""),
            Key::new("posts", 1).with_parent(Key::incomplete("users")),
            Key::new("posts", 1).with_parent(Key::new("", 1)),
        ];
        for key in &bad {
            let err = resolve_key(key).unwrap_err();
            assert!(matches!(err, Error::InvalidKey { .. }), "{key}: {err}");
        }
    }

    #[test]
    fn assign_id_prefers_names() {
        let mut key = Key::incomplete("users");
        assign_id(&mut key, &NativeKey::new_id("users", 42, None));
        assert_eq!(key.id, Some(KeyId::Int(42)));

        assign_id(&mut key, &NativeKey::new_name("users", "ada", None));
        assert_eq!(key.id, Some(KeyId::Str("ada".into())));
    }

    #[test]
    fn generated_ids() {
        assert_eq!(generate_id(IdGenerator::StoreAssigned), None);

        match generate_id(IdGenerator::RandomString(12)) {
            Some(KeyId::Str(id)) => {
                assert_eq!(id.len(), 12);
                assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
            }
            other => panic!("unexpected id {other:?}"),
        }

        match generate_id(IdGenerator::Uuid) {
            Some(KeyId::Str(id)) => assert!(Uuid::parse_str(&id).is_ok()),
            other => panic!("unexpected id {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn complete_keys_resolve_and_validate(key in complete_key_strategy()) {
            let resolved = resolve_key(&key).unwrap();
            prop_assert!(!resolved.is_incomplete());
            prop_assert!(resolved.native().valid());
            prop_assert_eq!(resolved.native().kind(), key.collection.as_str());
        }
    }
}
