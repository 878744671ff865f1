//! Marker representation.
//!
//! A marker is a located span of the buffer that denotes one candidate
//! structured entity. Markers are produced by matchers and carry the exact
//! raw text they cover so that segments can always be reconstructed.

use crate::core::EntityKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Marker syntax families.
///
/// Each rendering mode uses exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxMode {
    /// XML-like tags: `<contactcard name="..."></contactcard>`.
    Tag,
    /// Bracket-delimited JSON: `【CONTACT:{...}】`.
    Delimiter,
    /// Fenced-block JSON: `:::contact` + a `json` code fence + `:::`.
    Fenced,
}

impl SyntaxMode {
    /// Parses a syntax name.
    ///
    /// Accepts the family names as well as the renderer names they were
    /// first used by (`flowtoken`, `streamdown`, `llm-ui`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unknown names.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "xml" | "flowtoken" | "streamdown" => Ok(Self::Tag),
            "delimiter" | "bracket" | "llm-ui" | "llmui" => Ok(Self::Delimiter),
            "fenced" | "fence" | "markdown" => Ok(Self::Fenced),
            _ => Err(Error::Config {
                message: format!("unknown syntax mode: {s}"),
            }),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Delimiter => "delimiter",
            Self::Fenced => "fenced",
        }
    }

    /// All syntax families, in registration order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Tag, Self::Delimiter, Self::Fenced]
    }
}

impl fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a marker's close token has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completeness {
    /// Open token, payload and close token are all present.
    Complete,
    /// The buffer ended while the marker could still complete.
    Partial,
}

/// A region of the buffer denoting one structured entity.
///
/// # Examples
///
/// ```
/// use stream_gen::core::{EntityKind, Marker, SyntaxMode};
///
/// let buffer = "Hi <contact name=\"Jo";
/// let marker = Marker::partial(EntityKind::Contact, SyntaxMode::Tag, buffer, 3);
/// assert_eq!(marker.raw, "<contact name=\"Jo");
/// assert!(!marker.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Entity kind the open token announced.
    pub kind: EntityKind,

    /// Syntax family that produced the marker.
    pub syntax: SyntaxMode,

    /// Byte range in the buffer.
    pub byte_range: Range<usize>,

    /// Exact buffer substring covered by `byte_range`.
    pub raw: String,

    /// Complete or partial.
    pub completeness: Completeness,

    /// Payload region, relative to `raw` (complete markers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Range<usize>>,
}

impl Marker {
    /// Creates a complete marker over `range` of `buffer`.
    ///
    /// `payload` is given in absolute buffer offsets and stored relative to
    /// the marker start.
    #[must_use]
    pub fn complete(
        kind: EntityKind,
        syntax: SyntaxMode,
        buffer: &str,
        range: Range<usize>,
        payload: Option<Range<usize>>,
    ) -> Self {
        let payload = payload.map(|p| (p.start - range.start)..(p.end - range.start));
        Self {
            kind,
            syntax,
            raw: buffer[range.clone()].to_string(),
            byte_range: range,
            completeness: Completeness::Complete,
            payload,
        }
    }

    /// Creates a partial marker running from `start` to the end of `buffer`.
    #[must_use]
    pub fn partial(kind: EntityKind, syntax: SyntaxMode, buffer: &str, start: usize) -> Self {
        Self {
            kind,
            syntax,
            raw: buffer[start..].to_string(),
            byte_range: start..buffer.len(),
            completeness: Completeness::Partial,
            payload: None,
        }
    }

    /// Start offset in the buffer.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.byte_range.start
    }

    /// End offset in the buffer (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.byte_range.end
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.byte_range.end - self.byte_range.start
    }

    /// Returns true if the marker covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for complete markers.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }

    /// Returns the payload text, if the marker has one.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| self.raw.get(p.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_mode_parse() {
        assert_eq!(SyntaxMode::parse("tag").unwrap(), SyntaxMode::Tag);
        assert_eq!(SyntaxMode::parse("FlowToken").unwrap(), SyntaxMode::Tag);
        assert_eq!(SyntaxMode::parse("streamdown").unwrap(), SyntaxMode::Tag);
        assert_eq!(SyntaxMode::parse("llm-ui").unwrap(), SyntaxMode::Delimiter);
        assert_eq!(SyntaxMode::parse(" fenced ").unwrap(), SyntaxMode::Fenced);
        assert!(SyntaxMode::parse("yaml").is_err());
    }

    #[test]
    fn test_syntax_mode_display() {
        assert_eq!(SyntaxMode::Delimiter.to_string(), "delimiter");
        assert_eq!(SyntaxMode::all().len(), 3);
    }

    #[test]
    fn test_complete_marker_payload() {
        let buffer = "A 【EVENT:{\"title\":\"x\"}】 B";
        let start = buffer.find('【').unwrap();
        let end = buffer.find('】').unwrap() + '】'.len_utf8();
        let colon = buffer.find(':').unwrap();
        let marker = Marker::complete(
            EntityKind::Event,
            SyntaxMode::Delimiter,
            buffer,
            start..end,
            Some(colon + 1..end - '】'.len_utf8()),
        );
        assert!(marker.is_complete());
        assert_eq!(marker.payload(), Some("{\"title\":\"x\"}"));
        assert_eq!(marker.raw, &buffer[start..end]);
        assert_eq!(marker.len(), end - start);
    }

    #[test]
    fn test_partial_marker_runs_to_end() {
        let buffer = "text <contact";
        let marker = Marker::partial(EntityKind::Contact, SyntaxMode::Tag, buffer, 5);
        assert_eq!(marker.byte_range, 5..buffer.len());
        assert_eq!(marker.completeness, Completeness::Partial);
        assert!(marker.payload().is_none());
    }

    #[test]
    fn test_empty_partial_at_end() {
        let marker = Marker::partial(EntityKind::Contact, SyntaxMode::Tag, "abc", 3);
        assert!(marker.is_empty());
        assert_eq!(marker.raw, "");
    }
}
