//! JSON payload decoding for the delimiter and fenced families.

use crate::core::{Entity, EntityKind, Fields, Marker};
use crate::error::PayloadError;
use crate::matching::scan::open_depth;
use serde_json::{Map, Value};

/// Converts a JSON object into a field mapping.
///
/// String values are kept verbatim. For fields the kind knows about, any
/// other JSON type is an error. Unknown fields keep numbers and booleans
/// as their JSON text and drop nulls, arrays and objects.
///
/// # Errors
///
/// Returns [`PayloadError::InvalidFieldType`] when a known field is not a
/// string.
pub fn fields_from_object(kind: EntityKind, object: Map<String, Value>) -> Result<Fields, PayloadError> {
    let spec = kind.spec();
    let mut fields = Fields::new();

    for (key, value) in object {
        match value {
            Value::String(s) => {
                fields.insert(key, s);
            }
            _ if spec.is_known(&key) => {
                return Err(PayloadError::InvalidFieldType { field: key });
            }
            Value::Number(n) => {
                fields.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                fields.insert(key, b.to_string());
            }
            Value::Null | Value::Array(_) | Value::Object(_) => {}
        }
    }
    Ok(fields)
}

/// Parses a JSON payload into a field mapping.
///
/// # Errors
///
/// Returns [`PayloadError::MissingPayload`] for blank payloads,
/// [`PayloadError::Unbalanced`] when brackets are left open,
/// [`PayloadError::InvalidJson`] when parsing fails and
/// [`PayloadError::NotAnObject`] for non-object values.
pub fn parse_json_fields(kind: EntityKind, payload: &str) -> Result<Fields, PayloadError> {
    if payload.trim().is_empty() {
        return Err(PayloadError::MissingPayload);
    }

    let depth = open_depth(payload);
    if depth > 0 {
        return Err(PayloadError::Unbalanced { depth });
    }

    match serde_json::from_str::<Value>(payload)? {
        Value::Object(object) => fields_from_object(kind, object),
        other => Err(PayloadError::NotAnObject {
            found: json_type_name(&other).to_string(),
        }),
    }
}

/// Decodes a JSON-bodied marker into an entity.
///
/// # Errors
///
/// See [`parse_json_fields`]; validation errors come from [`Entity::new`].
pub fn decode_json(kind: EntityKind, marker: &Marker) -> Result<Entity, PayloadError> {
    let payload = marker.payload().ok_or(PayloadError::MissingPayload)?;
    let fields = parse_json_fields(kind, payload)?;
    Entity::new(kind, fields, marker.clone())
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_fields() {
        let fields = parse_json_fields(
            EntityKind::Event,
            r#"{"title":"Standup","date":"2026-03-01","startTime":"9:00 AM"}"#,
        )
        .unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("startTime").map(String::as_str), Some("9:00 AM"));
    }

    #[test]
    fn test_unknown_fields_are_stringified_or_dropped() {
        let fields = parse_json_fields(
            EntityKind::Contact,
            r#"{"name":"Jo","age":41,"vip":true,"tags":["a"],"meta":{},"nick":null}"#,
        )
        .unwrap();
        assert_eq!(fields.get("age").map(String::as_str), Some("41"));
        assert_eq!(fields.get("vip").map(String::as_str), Some("true"));
        assert!(!fields.contains_key("tags"));
        assert!(!fields.contains_key("meta"));
        assert!(!fields.contains_key("nick"));
    }

    #[test]
    fn test_known_field_must_be_string() {
        let err = parse_json_fields(EntityKind::Contact, r#"{"name":"Jo","phone":5551234}"#)
            .unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidFieldType {
                field: "phone".to_string()
            }
        );
    }

    #[test]
    fn test_payload_errors() {
        assert_eq!(
            parse_json_fields(EntityKind::Contact, "  "),
            Err(PayloadError::MissingPayload)
        );
        assert_eq!(
            parse_json_fields(EntityKind::Contact, r#"{"name":{"first":"Jo"}"#),
            Err(PayloadError::Unbalanced { depth: 1 })
        );
        assert!(matches!(
            parse_json_fields(EntityKind::Contact, r#"{"name":"Jo",}"#),
            Err(PayloadError::InvalidJson { .. })
        ));
        assert_eq!(
            parse_json_fields(EntityKind::Contact, r#"[{"name":"Jo"}]"#),
            Err(PayloadError::NotAnObject {
                found: "array".to_string()
            })
        );
    }
}
