//! Marker matcher trait definition.
//!
//! Defines the interface for all marker syntax families, enabling
//! pluggable marker recognition.

use crate::core::{Entity, Marker, SyntaxMode};
use crate::error::PayloadError;
use crate::matching::scan::{OpenMatch, OpenToken, Scan, trailing_open_prefix};

/// Markers found by one matcher in one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScan {
    /// Complete markers, in buffer order, non-overlapping.
    pub complete: Vec<Marker>,
    /// The trailing partial marker, if the buffer ends inside one.
    pub partial: Option<Marker>,
}

/// Trait for recognizing one marker syntax family.
///
/// Implementations must be `Send + Sync` so a segmenter can be shared
/// between threads. Matchers are stateless: every call sees the whole
/// buffer and produces the same answer for the same input.
///
/// # Examples
///
/// ```
/// use stream_gen::matching::{MarkerMatcher, TagMatcher};
///
/// let matcher = TagMatcher::new();
/// let scan = matcher.scan("Hi <contact name=\"Jo\"></contact> <event", 0);
/// assert_eq!(scan.complete.len(), 1);
/// assert!(scan.partial.is_some());
/// ```
pub trait MarkerMatcher: Send + Sync {
    /// Returns the matcher's name.
    fn name(&self) -> &'static str;

    /// Syntax family this matcher recognizes.
    fn syntax(&self) -> SyntaxMode;

    /// Open tokens this matcher recognizes.
    fn open_tokens(&self) -> &[OpenToken];

    /// Whether open tokens match regardless of ASCII case.
    fn case_insensitive(&self) -> bool {
        false
    }

    /// Whether a marker may open at `start`.
    fn is_open_position(&self, _buffer: &str, _start: usize) -> bool {
        true
    }

    /// Finds the next open token at or after `from`.
    fn next_open(&self, buffer: &str, from: usize) -> Option<OpenMatch>;

    /// Classifies the candidate marker beginning at `open`.
    fn scan_at(&self, buffer: &str, open: &OpenMatch) -> Scan;

    /// Decodes a complete marker into an entity.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] if the payload is missing, malformed or
    /// lacks required fields.
    fn decode(&self, marker: &Marker) -> Result<Entity, PayloadError>;

    /// Returns a description of the syntax family.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Scans the buffer from `from` for complete markers and the trailing
    /// partial marker.
    fn scan(&self, buffer: &str, from: usize) -> MatchScan {
        let syntax = self.syntax();
        let mut complete = Vec::new();
        let mut pos = from;

        while let Some(open) = self.next_open(buffer, pos) {
            match self.scan_at(buffer, &open) {
                Scan::Complete { end, payload } => {
                    complete.push(Marker::complete(
                        open.kind,
                        syntax,
                        buffer,
                        open.start..end,
                        payload,
                    ));
                    pos = end;
                }
                Scan::Incomplete => {
                    // An incomplete marker always runs to the end of the buffer.
                    let partial = Marker::partial(open.kind, syntax, buffer, open.start);
                    return MatchScan {
                        complete,
                        partial: Some(partial),
                    };
                }
                Scan::Invalid => {
                    let step = buffer[open.start..].chars().next().map_or(1, char::len_utf8);
                    pos = open.start + step;
                }
            }
        }

        let partial = trailing_open_prefix(
            buffer,
            pos,
            self.open_tokens(),
            self.case_insensitive(),
            |b, s| self.is_open_position(b, s),
        )
        .map(|(start, kind)| Marker::partial(kind, syntax, buffer, start));

        MatchScan { complete, partial }
    }

    /// Returns every complete marker at or after `from`.
    fn find_complete(&self, buffer: &str, from: usize) -> Vec<Marker> {
        self.scan(buffer, from).complete
    }

    /// Returns the trailing partial marker at or after `from`, if any.
    fn find_partial(&self, buffer: &str, from: usize) -> Option<Marker> {
        self.scan(buffer, from).partial
    }
}
