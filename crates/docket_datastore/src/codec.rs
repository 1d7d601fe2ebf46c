//! CBOR payload encoding.

use crate::error::{DatastoreError, DatastoreResult};
use crate::Value;
use serde::de::DeserializeOwned;

pub(crate) fn encode(value: &Value) -> DatastoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)
        .map_err(|e| DatastoreError::codec(e.to_string()))?;
    Ok(bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> DatastoreResult<T> {
    ciborium::de::from_reader(bytes).map_err(|e| DatastoreError::codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_payload_survives_storage() {
        let value = Value::Map(vec![
            (Value::Text("name".into()), Value::Text("ada".into())),
            (Value::Text("age".into()), Value::Integer(36.into())),
        ]);
        let bytes = encode(&value).unwrap();
        let decoded: Value = decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn truncated_bytes_fail() {
        let bytes = encode(&Value::Text("hello".into())).unwrap();
        let result: DatastoreResult<Value> = decode(&bytes[..2]);
        assert!(matches!(result, Err(DatastoreError::Codec { .. })));
    }
}
