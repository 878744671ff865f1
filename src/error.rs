//! Error types for stream-gen operations.
//!
//! This module provides the error hierarchy using `thiserror` for payload
//! decoding, matcher registration, streaming sessions, I/O and configuration.
//!
//! Payload errors are local and recoverable: the segmentation engine turns
//! them into diagnostics and keeps going. Registration, session, I/O and
//! configuration errors surface as `Err` from public operations.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for stream-gen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A complete marker's payload failed to decode or validate.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// Two registered matchers claim the same open token.
    #[error("ambiguous overlap: {first} and {second} both match \"{token}\"")]
    AmbiguousOverlap {
        /// Name of the matcher registered first.
        first: String,
        /// Name of the conflicting matcher.
        second: String,
        /// The open token both matchers can start on.
        token: String,
    },

    /// Streaming session errors.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Reasons a marker payload cannot become an entity.
///
/// Cloneable and comparable so it can be carried inside a
/// [`ParseResult`](crate::core::ParseResult) diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum PayloadError {
    /// The marker carries no payload region at all.
    #[error("marker has no payload")]
    MissingPayload,

    /// Entities are only built from complete markers.
    #[error("marker is not complete")]
    IncompleteMarker,

    /// The JSON payload did not parse.
    #[error("invalid JSON: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },

    /// JSON brackets were still open when the marker closed.
    #[error("unbalanced payload: {depth} unclosed bracket(s)")]
    Unbalanced {
        /// Nesting depth at the closing delimiter.
        depth: usize,
    },

    /// The JSON payload is not an object.
    #[error("payload must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: String,
    },

    /// A required field is absent or empty.
    #[error("{message}")]
    MissingField {
        /// Field name.
        field: String,
        /// Rendered validation message from the kind's template.
        message: String,
    },

    /// A known field holds a non-string value.
    #[error("field \"{field}\" must be a string")]
    InvalidFieldType {
        /// Field name.
        field: String,
    },

    /// The tag's attribute list could not be read.
    #[error("malformed attributes: {reason}")]
    MalformedAttributes {
        /// What went wrong.
        reason: String,
    },
}

/// Streaming session errors.
#[derive(Error, Debug)]
pub enum StreamError {
    /// A chunk arrived after the stream was finished.
    #[error("stream already finished")]
    AlreadyFinished,

    /// A data-stream line could not be decoded.
    #[error("invalid wire line: {line}: {reason}")]
    InvalidWireLine {
        /// The offending line (truncated).
        line: String,
        /// Reason for failure.
        reason: String,
    },

    /// Unknown content preset.
    #[error("unknown preset: {name}")]
    UnknownPreset {
        /// Name that was requested.
        name: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Input is not valid UTF-8.
    #[error("invalid UTF-8 in {source_name} at byte offset {offset}")]
    InvalidUtf8 {
        /// Where the bytes came from.
        source_name: String,
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// The reader on the other end of a pipe went away.
    #[error("broken pipe")]
    BrokenPipe,

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            return Self::Io(IoError::BrokenPipe);
        }
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson {
            reason: err.to_string(),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::Config {
            message: format!("regex error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_overlap_display() {
        let err = Error::AmbiguousOverlap {
            first: "tag".to_string(),
            second: "tag".to_string(),
            token: "<contact".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ambiguous overlap: tag and tag both match \"<contact\""
        );
    }

    #[test]
    fn test_payload_error_display() {
        let err = PayloadError::MissingField {
            field: "name".to_string(),
            message: "contact missing required \"name\" field".to_string(),
        };
        assert_eq!(err.to_string(), "contact missing required \"name\" field");

        let err = PayloadError::Unbalanced { depth: 2 };
        assert_eq!(err.to_string(), "unbalanced payload: 2 unclosed bracket(s)");

        let err = PayloadError::NotAnObject {
            found: "array".to_string(),
        };
        assert!(err.to_string().contains("array"));

        let err = PayloadError::InvalidFieldType {
            field: "email".to_string(),
        };
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_stream_error_display() {
        assert_eq!(
            StreamError::AlreadyFinished.to_string(),
            "stream already finished"
        );
        let err = StreamError::UnknownPreset {
            name: "bogus".to_string(),
        };
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_io_error_display() {
        let err = IoError::FileNotFound {
            path: "/tmp/test.txt".to_string(),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/test.txt");

        let err = IoError::InvalidUtf8 {
            source_name: "stdin".to_string(),
            offset: 3,
        };
        assert_eq!(err.to_string(), "invalid UTF-8 in stdin at byte offset 3");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));

        let pipe = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = pipe.into();
        assert!(matches!(err, Error::Io(IoError::BrokenPipe)));
    }

    #[test]
    fn test_error_from_payload() {
        let err: Error = PayloadError::MissingPayload.into();
        assert!(matches!(err, Error::MalformedPayload(_)));
        assert_eq!(err.to_string(), "malformed payload: marker has no payload");
    }

    #[test]
    fn test_from_serde_json_error_to_payload_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: PayloadError = json_err.into();
        assert!(matches!(err, PayloadError::InvalidJson { .. }));
    }

    #[test]
    #[allow(clippy::invalid_regex)]
    fn test_from_regex_error() {
        let regex_err = regex::Regex::new("[invalid").unwrap_err();
        let err: Error = regex_err.into();
        assert!(matches!(err, Error::Config { .. }));
    }
}
