//! Field-level update descriptors.

use crate::Data;

/// Sets a single field of a stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Dotted path of the field to change.
    pub field: String,
    /// New value for the field.
    pub value: Data,
}

impl Update {
    /// Creates an update.
    pub fn new(field: impl Into<String>, value: Data) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Condition that must hold before an update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The record must already exist.
    Exists,
}
