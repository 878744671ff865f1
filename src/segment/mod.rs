//! Incremental segmentation.
//!
//! Splits an accumulated buffer into an ordered sequence of text and entity
//! segments, hiding a trailing marker that has not closed yet. Re-running
//! on a longer buffer never changes segments already produced, apart from
//! extending a trailing text segment.

pub mod config;
pub mod engine;

pub use config::{DecodeFailurePolicy, SegmenterConfig, WhitespacePolicy};
pub use engine::Segmenter;

use crate::core::{ParseResult, SyntaxMode};

/// Segments a buffer that may still grow, using one syntax family.
///
/// # Examples
///
/// ```
/// use stream_gen::core::SyntaxMode;
/// use stream_gen::segment::segment;
///
/// let result = segment("Saved 【CONTACT:{\"name\":\"Jo\"}】", SyntaxMode::Delimiter);
/// assert_eq!(result.entity_count(), 1);
/// ```
#[must_use]
pub fn segment(buffer: &str, syntax: SyntaxMode) -> ParseResult {
    Segmenter::for_syntax(syntax).segment(buffer)
}

/// Segments a buffer after the stream has finished.
///
/// Any marker left open is shown as plain text.
#[must_use]
pub fn segment_finished(buffer: &str, syntax: SyntaxMode) -> ParseResult {
    Segmenter::for_syntax(syntax).segment_finished(buffer)
}
