//! Records: a key paired with a payload.

use crate::error::Error;
use crate::key::Key;
use crate::Data;
use serde::Serialize;

/// Capabilities an adapter needs from a record.
///
/// Adapters read the key and data, write store-assigned identifiers back
/// through [`Record::key_mut`], and may report per-record failures through
/// [`Record::set_error`].
pub trait Record: Send {
    /// Returns the record's key.
    fn key(&self) -> &Key;

    /// Returns the record's key for in-place modification.
    fn key_mut(&mut self) -> &mut Key;

    /// Returns the payload, `None` if the record carries no data.
    fn data(&self) -> Option<&Data>;

    /// Attaches an error to this record.
    fn set_error(&mut self, err: Error);

    /// Returns the error attached to this record, if any.
    fn error(&self) -> Option<&Error>;
}

/// The stock [`Record`] implementation.
#[derive(Debug, Clone)]
pub struct DataRecord {
    key: Key,
    data: Option<Data>,
    error: Option<Error>,
}

impl DataRecord {
    /// Creates a record.
    pub fn new(key: Key, data: Option<Data>) -> Self {
        Self {
            key,
            data,
            error: None,
        }
    }

    /// Creates a record whose payload is `value` converted to [`Data`].
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as [`Data`].
    pub fn from_serializable<T: Serialize + ?Sized>(
        key: Key,
        value: &T,
    ) -> Result<Self, ciborium::value::Error> {
        Ok(Self::new(key, Some(Data::serialized(value)?)))
    }

    /// Replaces the payload.
    pub fn set_data(&mut self, data: Option<Data>) {
        self.data = data;
    }

    /// Consumes the record, returning its key and payload.
    pub fn into_parts(self) -> (Key, Option<Data>) {
        (self.key, self.data)
    }
}

impl Record for DataRecord {
    fn key(&self) -> &Key {
        &self.key
    }

    fn key_mut(&mut self) -> &mut Key {
        &mut self.key
    }

    fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }

    fn set_error(&mut self, err: Error) {
        self.error = Some(err);
    }

    fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}
