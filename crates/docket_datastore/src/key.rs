//! Datastore keys.

use std::fmt;
use std::sync::Arc;

/// Identifies an entity in the datastore.
///
/// A key is a path of `(kind, id)` segments from the entity-group root down
/// to the entity. Each segment carries either a positive numeric id or a
/// non-empty name. A leaf segment with neither is *incomplete*; the store
/// allocates a numeric id for it on write. Ancestors must always be complete.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: String,
    id: i64,
    name: String,
    parent: Option<Arc<Key>>,
}

impl Key {
    /// Creates an incomplete key.
    pub fn new_incomplete(kind: impl Into<String>, parent: Option<Key>) -> Self {
        Self {
            kind: kind.into(),
            id: 0,
            name: String::new(),
            parent: parent.map(Arc::new),
        }
    }

    /// Creates a key with a numeric id.
    pub fn new_id(kind: impl Into<String>, id: i64, parent: Option<Key>) -> Self {
        Self {
            id,
            ..Self::new_incomplete(kind, parent)
        }
    }

    /// Creates a key with a string name.
    pub fn new_name(kind: impl Into<String>, name: impl Into<String>, parent: Option<Key>) -> Self {
        Self {
            name: name.into(),
            ..Self::new_incomplete(kind, parent)
        }
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the numeric id, 0 if unset.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the name, empty if unset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent key.
    #[must_use]
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// Returns true if the key has neither id nor name.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.id == 0 && self.name.is_empty()
    }

    /// Returns the root of the key path, which names the entity group.
    #[must_use]
    pub fn root(&self) -> &Key {
        let mut key = self;
        while let Some(parent) = key.parent() {
            key = parent;
        }
        key
    }

    /// Checks the key can be stored, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.kind.is_empty() {
            return Err("empty kind".to_string());
        }
        if self.id < 0 {
            return Err(format!("negative id {} in {self}", self.id));
        }
        if self.id != 0 && !self.name.is_empty() {
            return Err(format!("both id and name set in {self}"));
        }
        if let Some(parent) = self.parent() {
            if parent.is_incomplete() {
                return Err(format!("incomplete ancestor {parent}"));
            }
            parent.validate()?;
        }
        Ok(())
    }

    /// Returns true if [`Key::validate`] succeeds.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Returns a copy of this incomplete key with `id` filled in.
    pub(crate) fn complete_with(&self, id: i64) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{parent}")?;
        }
        if self.name.is_empty() {
            write!(f, "/{},{}", self.kind, self.id)
        } else {
            write!(f, "/{},{:?}", self.kind, self.name)
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_detection() {
        assert!(Key::new_incomplete("User", None).is_incomplete());
        assert!(!Key::new_id("User", 1, None).is_incomplete());
        assert!(!Key::new_name("User", "ada", None).is_incomplete());
    }

    #[test]
    fn display_walks_from_root() {
        let parent = Key::new_id("User", 7, None);
        let key = Key::new_name("Post", "hello", Some(parent));
        assert_eq!(key.to_string(), "/User,7/Post,\"hello\"");
        assert_eq!(Key::new_incomplete("User", None).to_string(), "/User,0");
    }

    #[test]
    fn root_is_entity_group() {
        let root = Key::new_id("User", 1, None);
        let child = Key::new_id("Post", 2, Some(root.clone()));
        let grandchild = Key::new_incomplete("Comment", Some(child));
        assert_eq!(grandchild.root(), &root);
        assert_eq!(root.root(), &root);
    }

    #[test]
    fn validation() {
        assert!(Key::new_id("User", 1, None).valid());
        assert!(Key::new_incomplete("User", None).valid());
        assert!(!Key::new_id("", 1, None).valid());
        assert!(!Key::new_id("User", -1, None).valid());

        let incomplete_parent = Key::new_incomplete("User", None);
        let key = Key::new_id("Post", 1, Some(incomplete_parent));
        let err = key.validate().unwrap_err();
        assert!(err.contains("incomplete ancestor"), "{err}");
    }

    #[test]
    fn complete_with_keeps_path() {
        let parent = Key::new_id("User", 1, None);
        let key = Key::new_incomplete("Post", Some(parent.clone())).complete_with(99);
        assert_eq!(key.id(), 99);
        assert_eq!(key.parent(), Some(&parent));
    }
}
