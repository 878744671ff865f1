//! Streaming session driver.
//!
//! Accumulates chunks into a buffer and re-segments it after each one.
//! Results are cached by buffer length, so asking twice without a new
//! chunk does not re-run the engine.

use crate::core::{ParseResult, SyntaxMode};
use crate::error::{Result, StreamError};
use crate::segment::Segmenter;
use crate::stream::wire::WirePart;
use tracing::{debug, trace};

/// One streamed reply being parsed.
///
/// # Examples
///
/// ```
/// use stream_gen::core::SyntaxMode;
/// use stream_gen::stream::StreamSession;
///
/// let mut session = StreamSession::for_syntax(SyntaxMode::Delimiter);
/// let live = session.push("Hi 【CONTACT:{\"name\":").unwrap();
/// assert!(live.has_pending_partial);
/// let live = session.push("\"Jo\"}】").unwrap();
/// assert_eq!(live.entity_count(), 1);
/// assert_eq!(session.finish().entity_count(), 1);
/// assert!(session.push("more").is_err());
/// ```
#[derive(Debug)]
pub struct StreamSession {
    buffer: String,
    segmenter: Segmenter,
    cache: Option<(usize, ParseResult)>,
    finished: bool,
    chunks: usize,
}

impl StreamSession {
    /// Creates a session around a configured segmenter.
    #[must_use]
    pub const fn new(segmenter: Segmenter) -> Self {
        Self {
            buffer: String::new(),
            segmenter,
            cache: None,
            finished: false,
            chunks: 0,
        }
    }

    /// Creates a session for one syntax family with default settings.
    #[must_use]
    pub fn for_syntax(syntax: SyntaxMode) -> Self {
        Self::new(Segmenter::for_syntax(syntax))
    }

    /// Appends a chunk and returns the updated result.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyFinished`] after [`finish`](Self::finish).
    pub fn push(&mut self, chunk: &str) -> Result<&ParseResult> {
        if self.finished {
            return Err(StreamError::AlreadyFinished.into());
        }
        self.buffer.push_str(chunk);
        self.chunks += 1;
        trace!(chunk = self.chunks, len = self.buffer.len(), "chunk received");
        Ok(self.current())
    }

    /// Marks the stream as ended and returns the final result.
    ///
    /// Calling it again returns the same result.
    pub fn finish(&mut self) -> &ParseResult {
        if !self.finished {
            self.finished = true;
            self.cache = None;
            let result = self.current();
            debug!(
                entities = result.entity_count(),
                diagnostics = result.diagnostics.len(),
                "stream finished"
            );
        }
        self.current()
    }

    /// Feeds one data-stream part: text is pushed, `e` and `d` finish.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyFinished`] for text after a finish part.
    pub fn apply(&mut self, part: &WirePart) -> Result<&ParseResult> {
        match part {
            WirePart::Text(text) => self.push(text),
            WirePart::Finish(_) | WirePart::Done(_) => Ok(self.finish()),
        }
    }

    /// Result for the current buffer.
    pub fn current(&mut self) -> &ParseResult {
        let len = self.buffer.len();
        if self.cache.as_ref().is_some_and(|(at, _)| *at != len) {
            self.cache = None;
        }
        let (_, result) = self.cache.get_or_insert_with(|| {
            let result = if self.finished {
                self.segmenter.segment_finished(&self.buffer)
            } else {
                self.segmenter.segment(&self.buffer)
            };
            (len, result)
        });
        result
    }

    /// Accumulated text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// True once the stream has been finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of chunks pushed.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// The segmenter in use.
    #[must_use]
    pub const fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }
}
