//! Segments and parse results.
//!
//! A parse result is an ordered, gapless sequence of segments covering the
//! visible part of the buffer, plus the hidden trailing partial marker (if
//! any) and the diagnostics raised while decoding.

use crate::core::{Entity, EntityKind, Marker};
use crate::error::PayloadError;
use serde::Serialize;
use std::ops::Range;

/// One unit of the output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// Prose span.
    Text {
        /// Byte range in the buffer.
        byte_range: Range<usize>,
        /// The prose itself.
        text: String,
    },
    /// Decoded entity.
    Entity {
        /// The entity, including its source marker.
        entity: Entity,
    },
}

impl Segment {
    /// Creates a text segment over `range` of `buffer`.
    #[must_use]
    pub fn text(buffer: &str, range: Range<usize>) -> Self {
        Self::Text {
            text: buffer[range.clone()].to_string(),
            byte_range: range,
        }
    }

    /// Byte range covered in the buffer.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        match self {
            Self::Text { byte_range, .. } => byte_range.clone(),
            Self::Entity { entity } => entity.marker.byte_range.clone(),
        }
    }

    /// Exact buffer text this segment covers.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Entity { entity } => &entity.marker.raw,
        }
    }

    /// Returns the prose if this is a text segment.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Entity { .. } => None,
        }
    }

    /// Returns the entity if this is an entity segment.
    #[must_use]
    pub const fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity { entity } => Some(entity),
            Self::Text { .. } => None,
        }
    }
}

/// Non-fatal problems found while segmenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A complete marker did not decode; it was dropped or shown as text.
    MalformedPayload {
        /// Kind the marker announced.
        kind: EntityKind,
        /// Marker location.
        byte_range: Range<usize>,
        /// Why decoding failed.
        error: PayloadError,
    },
    /// A complete marker overlapped an earlier one and was ignored.
    OverlapSkipped {
        /// Kind the skipped marker announced.
        kind: EntityKind,
        /// Skipped marker location.
        byte_range: Range<usize>,
    },
    /// The stream ended inside a marker; its text was shown as prose.
    UnterminatedStream {
        /// Kind the marker announced.
        kind: EntityKind,
        /// Location of the unterminated marker.
        byte_range: Range<usize>,
    },
}

impl Diagnostic {
    /// Byte range the diagnostic refers to.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        match self {
            Self::MalformedPayload { byte_range, .. }
            | Self::OverlapSkipped { byte_range, .. }
            | Self::UnterminatedStream { byte_range, .. } => byte_range.clone(),
        }
    }

    /// Human-readable one-line description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MalformedPayload {
                kind,
                byte_range,
                error,
            } => format!(
                "malformed {kind} at {}..{}: {error}",
                byte_range.start, byte_range.end
            ),
            Self::OverlapSkipped { kind, byte_range } => format!(
                "overlapping {kind} at {}..{} skipped",
                byte_range.start, byte_range.end
            ),
            Self::UnterminatedStream { kind, byte_range } => format!(
                "unterminated {kind} at {}..{} shown as text",
                byte_range.start, byte_range.end
            ),
        }
    }
}

/// Output of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Ordered segments covering `[0, effective_end)`.
    pub segments: Vec<Segment>,

    /// True iff a trailing partial marker was excluded from `segments`.
    pub has_pending_partial: bool,

    /// The excluded partial marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Marker>,

    /// End of the visible region (start of the pending marker, or buffer length).
    pub effective_end: usize,

    /// Decode failures, overlaps and flushed partials.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Iterates over the decoded entities.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.segments.iter().filter_map(Segment::as_entity)
    }

    /// Iterates over the text segments' prose.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::as_text)
    }

    /// Concatenates every segment's raw text in order.
    #[must_use]
    pub fn visible_raw(&self) -> String {
        self.segments.iter().map(Segment::raw).collect()
    }

    /// Visible raw text followed by the pending marker's raw text.
    ///
    /// Equals the input buffer when whitespace is kept and decode failures
    /// fall back to text.
    #[must_use]
    pub fn reconstruct(&self) -> String {
        let mut out = self.visible_raw();
        if let Some(pending) = &self.pending {
            out.push_str(&pending.raw);
        }
        out
    }

    /// Number of entity segments.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, SyntaxMode};

    fn contact_segment(buffer: &str, range: Range<usize>) -> Segment {
        let marker = Marker::complete(EntityKind::Contact, SyntaxMode::Tag, buffer, range, None);
        let mut fields = Fields::new();
        fields.insert("name".to_string(), "Jo".to_string());
        Segment::Entity {
            entity: Entity::new(EntityKind::Contact, fields, marker).unwrap(),
        }
    }

    #[test]
    fn test_segment_raw_and_range() {
        let buffer = "Hi <contact name=\"Jo\"/> bye";
        let text = Segment::text(buffer, 0..3);
        assert_eq!(text.raw(), "Hi ");
        assert_eq!(text.byte_range(), 0..3);
        assert!(text.as_entity().is_none());

        let entity = contact_segment(buffer, 3..23);
        assert_eq!(entity.raw(), "<contact name=\"Jo\"/>");
        assert!(entity.as_text().is_none());
    }

    #[test]
    fn test_reconstruct_includes_pending() {
        let buffer = "Hi <contact name=\"Jo";
        let result = ParseResult {
            segments: vec![Segment::text(buffer, 0..3)],
            has_pending_partial: true,
            pending: Some(Marker::partial(EntityKind::Contact, SyntaxMode::Tag, buffer, 3)),
            effective_end: 3,
            diagnostics: Vec::new(),
        };
        assert_eq!(result.visible_raw(), "Hi ");
        assert_eq!(result.reconstruct(), buffer);
        assert_eq!(result.entity_count(), 0);
        assert_eq!(result.texts().collect::<Vec<_>>(), vec!["Hi "]);
    }

    #[test]
    fn test_diagnostic_message() {
        let diag = Diagnostic::MalformedPayload {
            kind: EntityKind::Contact,
            byte_range: 0..19,
            error: PayloadError::MissingPayload,
        };
        assert_eq!(diag.message(), "malformed contact at 0..19: marker has no payload");
        assert_eq!(diag.byte_range(), 0..19);
    }

    #[test]
    fn test_segment_serializes_with_type_tag() {
        let segment = Segment::text("Hi", 0..2);
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "Hi");
    }
}
