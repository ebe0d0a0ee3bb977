//! Mapping between plain JSON and Firestore's typed REST values.

use chrono::DateTime;
use serde_json::{Map, Value, json};

use aegis_core::error::StoreError;
use aegis_core::ports::Document;

/// Encode one plain JSON value as a Firestore typed value.
///
/// Strings that parse as RFC 3339 become `timestampValue`, so range
/// filters against timestamp fields keep working for values we wrote
/// ourselves (the JS SDK gives Date objects the same treatment).
pub fn to_wire(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => {
            if DateTime::parse_from_rfc3339(s).is_ok() {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_wire).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({
            "mapValue": { "fields": encode_map(fields) }
        }),
    }
}

/// Encode a whole field map for a write body.
pub fn encode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(encode_map(fields))
}

fn encode_map(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), to_wire(value)))
        .collect()
}

/// Decode one Firestore typed value back into plain JSON. Timestamps
/// decode to their RFC 3339 strings, which is what the entity decoders
/// expect.
pub fn from_wire(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| inner.as_i64())
            .map(Value::from)
            .unwrap_or(Value::Null),
        "timestampValue" | "stringValue" | "referenceValue" => inner.clone(),
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map(|values| Value::Array(values.iter().map(from_wire).collect()))
            .unwrap_or_else(|| json!([])),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map(|fields| {
                Value::Object(
                    fields
                        .iter()
                        .map(|(key, value)| (key.clone(), from_wire(value)))
                        .collect(),
                )
            })
            .unwrap_or_else(|| json!({})),
        _ => Value::Null,
    }
}

/// Decode a REST document resource (`{name, fields, ...}`) into the
/// port's `Document`.
pub fn decode_document(resource: &Value) -> Result<Document, StoreError> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode("document resource without a name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name);

    let fields = resource
        .get("fields")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(key, value)| (key.clone(), from_wire(value)))
                .collect()
        })
        .unwrap_or_default();

    Ok(Document {
        id: id.to_string(),
        fields,
    })
}
