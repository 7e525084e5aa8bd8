//! Conversion between Firestore's typed value encoding and `serde_json`.
//!
//! The REST API wraps every field in a `{ "<type>Value": ... }` object; the
//! rest of the crate works in plain JSON, so documents cross this boundary
//! on every read and write.

use super::models::{ArrayValue, MapValue, Value, ValueType};
use super::FirestoreError;
use serde::de::Error;
use serde::ser::Error as SerError;
use serde_json::map::Map;
use serde_json::Value as SerdeValue;
use std::collections::HashMap;

pub(crate) fn fields_to_json(
    fields: HashMap<String, Value>,
) -> Result<SerdeValue, FirestoreError> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key, value_to_json(value)?);
    }
    Ok(SerdeValue::Object(map))
}

pub(crate) fn value_to_json(value: Value) -> Result<SerdeValue, FirestoreError> {
    use serde_json::json;
    Ok(match value.value_type {
        ValueType::StringValue(s) => SerdeValue::String(s),
        ValueType::IntegerValue(s) => {
            let i: i64 = s.parse().map_err(|e| {
                <serde_json::Error as Error>::custom(format!(
                    "Failed to parse integer string '{}': {}",
                    s, e
                ))
            })?;
            SerdeValue::Number(i.into())
        }
        ValueType::DoubleValue(d) => SerdeValue::Number(
            serde_json::Number::from_f64(d).ok_or_else(|| {
                <serde_json::Error as Error>::custom(format!("Invalid f64 value: {}", d))
            })?,
        ),
        ValueType::BooleanValue(b) => SerdeValue::Bool(b),
        ValueType::MapValue(map_value) => fields_to_json(map_value.fields)?,
        ValueType::ArrayValue(array_value) => {
            let values = array_value
                .values
                .into_iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()?;
            SerdeValue::Array(values)
        }
        ValueType::NullValue(_) => SerdeValue::Null,
        ValueType::TimestampValue(s) => SerdeValue::String(s),
        ValueType::GeoPointValue(gp) => {
            json!({ "latitude": gp.latitude, "longitude": gp.longitude })
        }
        ValueType::BytesValue(s) => SerdeValue::String(s),
        ValueType::ReferenceValue(s) => SerdeValue::String(s),
    })
}

/// Encodes a JSON object as a Firestore field map. Only objects can become
/// documents; anything else is a serialization error.
pub(crate) fn json_to_fields(
    value: SerdeValue,
) -> Result<HashMap<String, Value>, FirestoreError> {
    if let SerdeValue::Object(map) = value {
        let mut fields = HashMap::new();
        for (k, v) in map {
            fields.insert(k, json_to_value(v)?);
        }
        Ok(fields)
    } else {
        Err(FirestoreError::SerializationError(SerError::custom(
            "Can only set objects as documents",
        )))
    }
}

pub(crate) fn json_to_value(value: SerdeValue) -> Result<Value, FirestoreError> {
    let value_type = match value {
        SerdeValue::Null => ValueType::NullValue(()),
        SerdeValue::Bool(b) => ValueType::BooleanValue(b),
        SerdeValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueType::IntegerValue(i.to_string())
            } else if let Some(f) = n.as_f64() {
                ValueType::DoubleValue(f)
            } else {
                return Err(FirestoreError::SerializationError(SerError::custom(
                    format!("Unsupported number type: {}", n),
                )));
            }
        }
        SerdeValue::String(s) => ValueType::StringValue(s),
        SerdeValue::Array(a) => {
            let values = a
                .into_iter()
                .map(json_to_value)
                .collect::<Result<Vec<_>, _>>()?;
            ValueType::ArrayValue(ArrayValue { values })
        }
        SerdeValue::Object(o) => {
            let mut fields = HashMap::new();
            for (k, v) in o {
                fields.insert(k, json_to_value(v)?);
            }
            ValueType::MapValue(MapValue { fields })
        }
    };
    Ok(Value { value_type })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_nested_objects() {
        let original = json!({
            "name": "prod",
            "count": 7,
            "ratio": 0.5,
            "enabled": true,
            "tags": ["a", "b"],
            "nested": { "deep": null }
        });
        let fields = json_to_fields(original.clone()).unwrap();
        let restored = fields_to_json(fields).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn integers_encode_as_strings() {
        let value = json_to_value(json!(42)).unwrap();
        let encoded = serde_json::to_value(&value).unwrap();
        assert_eq!(encoded, json!({ "integerValue": "42" }));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let err = json_to_fields(json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("objects"));
    }

    #[test]
    fn bad_integer_string_is_an_error() {
        let value = Value {
            value_type: ValueType::IntegerValue("not-a-number".into()),
        };
        assert!(value_to_json(value).is_err());
    }
}
