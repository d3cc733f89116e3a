// src/integrations/firestore/value.rs
//
// JSON <-> Firestore typed value encoding.
//
// Firestore REST wraps every value in a single-key object naming its type:
// {"stringValue": "x"}, {"integerValue": "3"}, {"mapValue": {"fields": {..}}}.

use chrono::DateTime;
use serde_json::{json, Map, Number, Value};

use crate::error::{AppError, AppResult};

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // int64 travels as a decimal string
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) if DateTime::parse_from_rfc3339(s).is_ok() => {
            json!({ "timestampValue": s })
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

pub fn decode_value(value: &Value) -> AppResult<Value> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("value is not an object", value))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| malformed("value has no type", value))?;

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| malformed("bad integerValue", value))?
        }
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| malformed("bad doubleValue", value))?,
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect::<AppResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Value::Array(items)
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Value::Object(fields)
        }
        other => {
            return Err(AppError::External(format!(
                "Unsupported Firestore value type: {}",
                other
            )))
        }
    };

    Ok(decoded)
}

pub fn decode_fields(fields: &Map<String, Value>) -> AppResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

fn malformed(reason: &str, value: &Value) -> AppError {
    AppError::External(format!("Malformed Firestore value ({}): {}", reason, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_value(&json!("MAT201")), json!({"stringValue": "MAT201"}));
        assert_eq!(encode_value(&json!(4)), json!({"integerValue": "4"}));
        assert_eq!(encode_value(&json!(3.5)), json!({"doubleValue": 3.5}));
        assert_eq!(encode_value(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode_value(&Value::Null), json!({"nullValue": null}));
    }

    #[test]
    fn test_rfc3339_strings_become_timestamps() {
        assert_eq!(
            encode_value(&json!("2024-03-01T10:00:00Z")),
            json!({"timestampValue": "2024-03-01T10:00:00Z"})
        );
        // plain dates stay strings
        assert_eq!(
            encode_value(&json!("2024-03-01")),
            json!({"stringValue": "2024-03-01"})
        );
    }

    #[test]
    fn test_nested_document_decodes_back() {
        let original = json!({
            "codigo": "ING301",
            "creditos": 3,
            "promedio": 4.1,
            "activa": true,
            "docente": null,
            "tags": ["movil", "ionic"],
            "meta": {"periodo": "2024-2"}
        });
        let fields = encode_fields(original.as_object().unwrap());
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(Value::Object(decoded), original);
    }

    #[test]
    fn test_integer_value_accepts_string_form() {
        assert_eq!(decode_value(&json!({"integerValue": "42"})).unwrap(), json!(42));
        assert!(decode_value(&json!({"integerValue": "forty"})).is_err());
    }

    #[test]
    fn test_empty_array_and_map_decode() {
        assert_eq!(decode_value(&json!({"arrayValue": {}})).unwrap(), json!([]));
        assert_eq!(decode_value(&json!({"mapValue": {}})).unwrap(), json!({}));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(decode_value(&json!({"geoPointValue": {}})).is_err());
    }
}
