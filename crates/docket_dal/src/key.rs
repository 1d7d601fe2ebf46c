//! Record keys.

use std::fmt;

/// Identifier part of a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyId {
    /// Numeric identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for KeyId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for KeyId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for KeyId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for KeyId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// Identifies a record.
///
/// A key is *complete* when it carries a caller-assigned [`KeyId`] and
/// *incomplete* when the identifier is left for the store to assign on
/// write. Keys may be nested under a parent key, which places the record
/// in its parent's entity group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Collection (kind) the record belongs to.
    pub collection: String,
    /// Identifier, `None` for incomplete keys.
    pub id: Option<KeyId>,
    /// Optional parent key.
    pub parent: Option<Box<Key>>,
}

impl Key {
    /// Creates a complete key.
    pub fn new(collection: impl Into<String>, id: impl Into<KeyId>) -> Self {
        Self {
            collection: collection.into(),
            id: Some(id.into()),
            parent: None,
        }
    }

    /// Creates an incomplete key whose identifier will be assigned by the store.
    pub fn incomplete(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: None,
            parent: None,
        }
    }

    /// Places this key under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Returns true if the key carries an identifier.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the parent key, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{parent}/")?;
        }
        match &self.id {
            Some(id) => write!(f, "{}/{id}", self.collection),
            None => write!(f, "{}/?", self.collection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness() {
        assert!(Key::new("users", 1).is_complete());
        assert!(Key::new("users", "alice").is_complete());
        assert!(!Key::incomplete("users").is_complete());
    }

    #[test]
    fn display_renders_path() {
        let key = Key::new("posts", "hello").with_parent(Key::new("users", 7));
        assert_eq!(key.to_string(), "users/7/posts/hello");
        assert_eq!(Key::incomplete("users").to_string(), "users/?");
    }

    #[test]
    fn parent_chain() {
        let key = Key::incomplete("comments")
            .with_parent(Key::new("posts", 2).with_parent(Key::new("users", 1)));
        let parent = key.parent().unwrap();
        assert_eq!(parent.collection, "posts");
        assert_eq!(parent.parent(), Some(&Key::new("users", 1)));
    }

    #[test]
    fn id_conversions() {
        assert_eq!(KeyId::from(5), KeyId::Int(5));
        assert_eq!(KeyId::from("x"), KeyId::Str("x".into()));
        assert_eq!(KeyId::from(String::from("y")), KeyId::Str("y".into()));
    }
}
