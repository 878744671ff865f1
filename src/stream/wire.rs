//! Data-stream wire lines.
//!
//! A streamed reply is sent as newline-terminated lines of the form
//! `<code>:<json>`. Code `0` carries a text delta as a JSON string; codes
//! `e` (finish step) and `d` (done) carry the finish reason and token usage.

use crate::error::StreamError;
use crate::io::preview;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token usage reported with the finish parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: usize,
    /// Tokens generated.
    pub completion_tokens: usize,
}

/// Payload of the `e` and `d` parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishInfo {
    /// Why generation stopped, e.g. `stop`.
    pub finish_reason: String,
    /// Token usage.
    pub usage: Usage,
}

impl FinishInfo {
    /// A normal `stop` finish.
    #[must_use]
    pub fn stop(usage: Usage) -> Self {
        Self {
            finish_reason: "stop".to_string(),
            usage,
        }
    }
}

/// One line of the data stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirePart {
    /// `0:` text delta.
    Text(String),
    /// `e:` end of a generation step.
    Finish(FinishInfo),
    /// `d:` end of the whole message.
    Done(FinishInfo),
}

impl WirePart {
    /// Single-character type code.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Text(_) => '0',
            Self::Finish(_) => 'e',
            Self::Done(_) => 'd',
        }
    }

    /// Encodes the part as a line, without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        // Serializing strings and plain structs cannot fail.
        let json = match self {
            Self::Text(text) => serde_json::to_string(text),
            Self::Finish(info) | Self::Done(info) => serde_json::to_string(info),
        }
        .unwrap_or_default();
        format!("{}:{json}", self.code())
    }

    /// Decodes a line (a trailing newline is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidWireLine`] for unknown codes or
    /// malformed JSON.
    pub fn parse(line: &str) -> Result<Self, StreamError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let invalid = |reason: String| StreamError::InvalidWireLine {
            line: preview(line, 40),
            reason,
        };

        let (code, json) = line
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' separator".to_string()))?;
        match code {
            "0" => serde_json::from_str(json)
                .map(Self::Text)
                .map_err(|e| invalid(e.to_string())),
            "e" => serde_json::from_str(json)
                .map(Self::Finish)
                .map_err(|e| invalid(e.to_string())),
            "d" => serde_json::from_str(json)
                .map(Self::Done)
                .map_err(|e| invalid(e.to_string())),
            other => Err(invalid(format!("unknown part code {other:?}"))),
        }
    }
}

impl fmt::Display for WirePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_line() {
        let part = WirePart::Text("Hi \"Jo\"\n".to_string());
        assert_eq!(part.to_line(), r#"0:"Hi \"Jo\"\n""#);
        assert_eq!(WirePart::parse(&format!("{part}\n")).unwrap(), part);
    }

    #[test]
    fn test_finish_line() {
        let part = WirePart::Finish(FinishInfo::stop(Usage {
            prompt_tokens: 10,
            completion_tokens: 42,
        }));
        assert_eq!(
            part.to_line(),
            r#"e:{"finishReason":"stop","usage":{"promptTokens":10,"completionTokens":42}}"#
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            WirePart::parse("no separator"),
            Err(StreamError::InvalidWireLine { .. })
        ));
        assert!(WirePart::parse("x:\"a\"").is_err());
        assert!(WirePart::parse("0:not json").is_err());
        assert!(WirePart::parse("d:{}").is_err());
    }
}
