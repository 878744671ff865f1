//! Segmenter configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with text segments that contain only whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitespacePolicy {
    /// Emit every non-empty gap, so segments reconstruct the buffer exactly.
    #[default]
    Keep,
    /// Omit all-whitespace text segments.
    DropBlank,
}

/// What to do with a complete marker whose payload does not decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFailurePolicy {
    /// Show the marker's raw text as a text segment.
    #[default]
    Fallback,
    /// Omit the marker from the output.
    Drop,
}

impl DecodeFailurePolicy {
    /// Parses a policy name (`fallback` or `drop`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unknown names.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fallback" | "text" => Ok(Self::Fallback),
            "drop" | "skip" => Ok(Self::Drop),
            _ => Err(Error::Config {
                message: format!("unknown decode failure policy: {s}"),
            }),
        }
    }
}

impl fmt::Display for DecodeFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fallback => "fallback",
            Self::Drop => "drop",
        })
    }
}

/// Options for a [`Segmenter`](super::Segmenter).
///
/// # Examples
///
/// ```
/// use stream_gen::segment::{DecodeFailurePolicy, SegmenterConfig, WhitespacePolicy};
///
/// let config = SegmenterConfig::new()
///     .with_whitespace(WhitespacePolicy::DropBlank)
///     .with_decode_failure(DecodeFailurePolicy::Drop);
/// assert_eq!(config.whitespace, WhitespacePolicy::DropBlank);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Whitespace-only text handling.
    pub whitespace: WhitespacePolicy,

    /// Decode failure handling.
    pub on_decode_error: DecodeFailurePolicy,
}

impl SegmenterConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the whitespace policy.
    #[must_use]
    pub const fn with_whitespace(mut self, whitespace: WhitespacePolicy) -> Self {
        self.whitespace = whitespace;
        self
    }

    /// Sets the decode failure policy.
    #[must_use]
    pub const fn with_decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.on_decode_error = policy;
        self
    }

    /// Returns true if `text` should become a segment under this config.
    #[must_use]
    pub fn keeps_text(&self, text: &str) -> bool {
        !text.is_empty()
            && (self.whitespace == WhitespacePolicy::Keep || !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SegmenterConfig::new();
        assert_eq!(config.whitespace, WhitespacePolicy::Keep);
        assert_eq!(config.on_decode_error, DecodeFailurePolicy::Fallback);
    }

    #[test]
    fn test_keeps_text() {
        let keep = SegmenterConfig::new();
        assert!(keep.keeps_text("  \n"));
        assert!(!keep.keeps_text(""));

        let drop = keep.with_whitespace(WhitespacePolicy::DropBlank);
        assert!(!drop.keeps_text("  \n"));
        assert!(drop.keeps_text(" x "));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(DecodeFailurePolicy::parse("DROP").unwrap(), DecodeFailurePolicy::Drop);
        assert_eq!(
            DecodeFailurePolicy::parse("fallback").unwrap(),
            DecodeFailurePolicy::Fallback
        );
        assert!(DecodeFailurePolicy::parse("explode").is_err());
        assert_eq!(DecodeFailurePolicy::Drop.to_string(), "drop");
    }
}
