//! Payload decoding.
//!
//! Turns the payload of a complete marker into a validated entity. Tag
//! markers carry `name="value"` attributes; delimiter and fenced markers
//! carry a JSON object.

pub mod attributes;
pub mod json;

pub use attributes::{decode_tag, parse_attributes, unescape_entities};
pub use json::{decode_json, fields_from_object, parse_json_fields};

use crate::core::{Entity, Marker, SyntaxMode};
use crate::error::PayloadError;

/// Decodes a complete marker according to its syntax family.
///
/// # Errors
///
/// Returns a [`PayloadError`] describing why the marker is not a valid
/// entity.
pub fn decode(marker: &Marker) -> Result<Entity, PayloadError> {
    match marker.syntax {
        SyntaxMode::Tag => decode_tag(marker.kind, marker),
        SyntaxMode::Delimiter | SyntaxMode::Fenced => decode_json(marker.kind, marker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityKind;

    #[test]
    fn test_decode_dispatches_on_syntax() {
        let raw = r#"【CONTACT:{"name":"Jo"}】"#;
        let start = '【'.len_utf8() + "CONTACT:".len();
        let end = raw.len() - '】'.len_utf8();
        let marker = Marker::complete(
            EntityKind::Contact,
            SyntaxMode::Delimiter,
            raw,
            0..raw.len(),
            Some(start..end),
        );
        let entity = decode(&marker).unwrap();
        assert_eq!(entity.get("name"), Some("Jo"));
    }

    #[test]
    fn test_decode_rejects_partial() {
        let marker = Marker::partial(EntityKind::Contact, SyntaxMode::Delimiter, "【CONTACT:{", 0);
        assert_eq!(decode(&marker), Err(PayloadError::MissingPayload));
    }
}
