//! The segmentation engine.
//!
//! A [`Segmenter`] is a pure function of the buffer and its registered
//! matchers: it holds no state between calls and never blocks, so it can
//! be re-run on every chunk of a streamed reply.

use crate::core::{Diagnostic, Marker, ParseResult, Segment, SyntaxMode};
use crate::error::{Error, Result};
use crate::io::preview;
use crate::matching::{MarkerMatcher, create_matcher};
use crate::segment::config::{DecodeFailurePolicy, SegmenterConfig};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Graphemes of raw marker text included in log lines.
const LOG_PREVIEW: usize = 60;

/// Splits buffers into text and entity segments.
///
/// # Examples
///
/// ```
/// use stream_gen::core::SyntaxMode;
/// use stream_gen::segment::Segmenter;
///
/// let segmenter = Segmenter::for_syntax(SyntaxMode::Tag);
/// let result = segmenter.segment("Call <contact name=\"Jo\"></contact> soon. <event ti");
/// assert_eq!(result.entity_count(), 1);
/// assert!(result.has_pending_partial);
/// assert_eq!(result.visible_raw(), "Call <contact name=\"Jo\"></contact> soon. ");
/// ```
pub struct Segmenter {
    matchers: Vec<Box<dyn MarkerMatcher>>,
    config: SegmenterConfig,
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field(
                "matchers",
                &self.matchers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

/// Working state of one segmentation pass.
struct Walk<'a> {
    buffer: &'a str,
    config: SegmenterConfig,
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
    consumed: Vec<Range<usize>>,
}

impl Walk<'_> {
    fn push_text(&mut self, range: Range<usize>) {
        if self.config.keeps_text(&self.buffer[range.clone()]) {
            self.segments.push(Segment::text(self.buffer, range));
        }
    }
}

impl Segmenter {
    /// Creates a segmenter over `matchers`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousOverlap`] if an open token of one matcher
    /// is a prefix of another matcher's open token, since both could then
    /// claim the same text.
    pub fn new(matchers: Vec<Box<dyn MarkerMatcher>>) -> Result<Self> {
        check_overlap(&matchers)?;
        Ok(Self {
            matchers,
            config: SegmenterConfig::default(),
        })
    }

    /// Creates a segmenter for a single syntax family.
    #[must_use]
    pub fn for_syntax(syntax: SyntaxMode) -> Self {
        Self {
            matchers: vec![create_matcher(syntax)],
            config: SegmenterConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Names of the registered matchers, in registration order.
    #[must_use]
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Segments a buffer that may still grow.
    ///
    /// A trailing marker that has not closed yet is withheld from the
    /// segments and reported through `pending`.
    #[must_use]
    pub fn segment(&self, buffer: &str) -> ParseResult {
        self.run(buffer, false)
    }

    /// Segments a buffer that will not grow any further.
    ///
    /// A marker that never closed is shown as plain text and reported as
    /// [`Diagnostic::UnterminatedStream`].
    #[must_use]
    pub fn segment_finished(&self, buffer: &str) -> ParseResult {
        self.run(buffer, true)
    }

    fn run(&self, buffer: &str, finished: bool) -> ParseResult {
        let mut candidates: Vec<(usize, Marker)> = Vec::new();
        let mut partials: Vec<Marker> = Vec::new();
        for (idx, matcher) in self.matchers.iter().enumerate() {
            let scan = matcher.scan(buffer, 0);
            candidates.extend(scan.complete.into_iter().map(|m| (idx, m)));
            partials.extend(scan.partial);
        }
        // Stable: equal starts keep registration order.
        candidates.sort_by_key(|(_, m)| m.start());
        partials.sort_by_key(Marker::start);

        let mut walk = Walk {
            buffer,
            config: self.config,
            segments: Vec::new(),
            diagnostics: Vec::new(),
            consumed: Vec::new(),
        };
        let mut cursor = 0;
        let mut pending: Option<Marker> = None;

        for (idx, marker) in candidates {
            if marker.start() < cursor {
                warn!(
                    kind = %marker.kind,
                    start = marker.start(),
                    end = marker.end(),
                    "skipping marker that overlaps an earlier one"
                );
                walk.diagnostics.push(Diagnostic::OverlapSkipped {
                    kind: marker.kind,
                    byte_range: marker.byte_range.clone(),
                });
                continue;
            }

            if !finished {
                // Another matcher's unfinished marker opens before this one.
                if let Some(p) = partials
                    .iter()
                    .find(|p| p.start() >= cursor && p.start() < marker.start())
                {
                    pending = Some(p.clone());
                    break;
                }
            }

            walk.push_text(cursor..marker.start());
            cursor = marker.end();
            walk.consumed.push(marker.byte_range.clone());
            self.emit_marker(&mut walk, idx, marker);
        }

        if pending.is_none() && !finished {
            pending = partials.iter().find(|p| p.start() >= cursor).cloned();
        }

        let effective_end = pending.as_ref().map_or(buffer.len(), Marker::start);
        if cursor < effective_end {
            walk.push_text(cursor..effective_end);
        }

        if finished {
            for partial in &partials {
                let inside = walk
                    .consumed
                    .iter()
                    .any(|r| r.contains(&partial.start()));
                if !inside {
                    debug!(
                        kind = %partial.kind,
                        start = partial.start(),
                        "stream ended inside a marker; showing it as text"
                    );
                    walk.diagnostics.push(Diagnostic::UnterminatedStream {
                        kind: partial.kind,
                        byte_range: partial.byte_range.clone(),
                    });
                }
            }
        }

        let result = ParseResult {
            has_pending_partial: pending.is_some(),
            pending,
            effective_end,
            segments: walk.segments,
            diagnostics: walk.diagnostics,
        };
        trace!(
            buffer_len = buffer.len(),
            segments = result.segments.len(),
            entities = result.entity_count(),
            pending = result.has_pending_partial,
            finished,
            "segmented buffer"
        );
        result
    }

    fn emit_marker(&self, walk: &mut Walk<'_>, idx: usize, marker: Marker) {
        let Some(matcher) = self.matchers.get(idx) else {
            return;
        };
        match matcher.decode(&marker) {
            Ok(entity) => walk.segments.push(Segment::Entity { entity }),
            Err(error) => {
                warn!(
                    kind = %marker.kind,
                    start = marker.start(),
                    %error,
                    raw = %preview(&marker.raw, LOG_PREVIEW),
                    "failed to decode marker"
                );
                if self.config.on_decode_error == DecodeFailurePolicy::Fallback {
                    walk.segments
                        .push(Segment::text(walk.buffer, marker.byte_range.clone()));
                }
                walk.diagnostics.push(Diagnostic::MalformedPayload {
                    kind: marker.kind,
                    byte_range: marker.byte_range,
                    error,
                });
            }
        }
    }
}

fn check_overlap(matchers: &[Box<dyn MarkerMatcher>]) -> Result<()> {
    for (i, first) in matchers.iter().enumerate() {
        for second in &matchers[i + 1..] {
            let ignore_case = first.case_insensitive() || second.case_insensitive();
            for a in first.open_tokens() {
                for b in second.open_tokens() {
                    let (short, long) = if a.text.len() <= b.text.len() {
                        (&a.text, &b.text)
                    } else {
                        (&b.text, &a.text)
                    };
                    let head = &long.as_bytes()[..short.len()];
                    let clash = if ignore_case {
                        head.eq_ignore_ascii_case(short.as_bytes())
                    } else {
                        head == short.as_bytes()
                    };
                    if clash {
                        return Err(Error::AmbiguousOverlap {
                            first: first.name().to_string(),
                            second: second.name().to_string(),
                            token: short.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
