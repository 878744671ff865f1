//! Mock content generator.
//!
//! Splits a canned reply into word and whitespace tokens and schedules them
//! the way a model would stream them: one longer delay before the first
//! token, then a fixed delay between tokens.

use crate::core::SyntaxMode;
use crate::stream::presets::{ChatMessage, Preset, reply_for};
use crate::stream::wire::{FinishInfo, Usage, WirePart};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Delay before the first token, in milliseconds.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;

/// Delay between tokens, in milliseconds.
pub const DEFAULT_CHUNK_DELAY_MS: u64 = 50;

/// Prompt token count reported in the finish parts.
pub const DEFAULT_PROMPT_TOKENS: usize = 10;

#[allow(clippy::expect_used)]
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\S+|\s+").expect("valid regex"))
}

/// Splits `content` into alternating runs of non-whitespace and whitespace.
///
/// Concatenating the tokens gives back `content`.
///
/// # Examples
///
/// ```
/// use stream_gen::stream::tokenize;
///
/// assert_eq!(tokenize("Hi  there\n"), vec!["Hi", "  ", "there", "\n"]);
/// ```
#[must_use]
pub fn tokenize(content: &str) -> Vec<&str> {
    token_regex().find_iter(content).map(|m| m.as_str()).collect()
}

/// Timing of a mock stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockStreamOptions {
    /// Delay before the first chunk.
    pub initial_delay: Duration,
    /// Delay before every later chunk.
    pub chunk_delay: Duration,
}

impl Default for MockStreamOptions {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            chunk_delay: Duration::from_millis(DEFAULT_CHUNK_DELAY_MS),
        }
    }
}

impl MockStreamOptions {
    /// No delays at all.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            chunk_delay: Duration::ZERO,
        }
    }
}

/// One scheduled chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// How long to wait before delivering the chunk.
    pub delay: Duration,
    /// Chunk text.
    pub text: String,
}

/// Iterator over the scheduled chunks of a canned reply.
///
/// # Examples
///
/// ```
/// use stream_gen::core::SyntaxMode;
/// use stream_gen::stream::{MockStream, MockStreamOptions, Preset};
///
/// let stream = MockStream::for_preset(Preset::Text, SyntaxMode::Tag, MockStreamOptions::instant());
/// let text: String = stream.map(|chunk| chunk.text).collect();
/// assert_eq!(text, Preset::Text.content(SyntaxMode::Tag));
/// ```
#[derive(Debug, Clone)]
pub struct MockStream {
    tokens: Vec<String>,
    options: MockStreamOptions,
    next: usize,
}

impl MockStream {
    /// Streams arbitrary content.
    #[must_use]
    pub fn new(content: &str, options: MockStreamOptions) -> Self {
        Self {
            tokens: tokenize(content).into_iter().map(String::from).collect(),
            options,
            next: 0,
        }
    }

    /// Streams a preset in the given syntax family.
    #[must_use]
    pub fn for_preset(preset: Preset, syntax: SyntaxMode, options: MockStreamOptions) -> Self {
        Self::new(preset.content(syntax), options)
    }

    /// Streams the reply chosen for a conversation.
    #[must_use]
    pub fn for_messages(
        messages: &[ChatMessage],
        syntax: SyntaxMode,
        options: MockStreamOptions,
    ) -> Self {
        Self::new(reply_for(messages, syntax), options)
    }

    /// Total number of tokens, delivered or not.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Usage reported when the stream finishes.
    #[must_use]
    pub fn usage(&self) -> Usage {
        Usage {
            prompt_tokens: DEFAULT_PROMPT_TOKENS,
            completion_tokens: self.tokens.len(),
        }
    }

    /// Sum of all delays.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        match self.tokens.len() {
            0 => Duration::ZERO,
            n => {
                let rest = u32::try_from(n - 1).unwrap_or(u32::MAX);
                self.options.initial_delay + self.options.chunk_delay.saturating_mul(rest)
            }
        }
    }

    /// The whole reply as data-stream parts: one text part per token, then
    /// the finish and done parts.
    #[must_use]
    pub fn wire_parts(&self) -> Vec<WirePart> {
        let finish = FinishInfo::stop(self.usage());
        self.tokens
            .iter()
            .cloned()
            .map(WirePart::Text)
            .chain([WirePart::Finish(finish.clone()), WirePart::Done(finish)])
            .collect()
    }
}

impl Iterator for MockStream {
    type Item = StreamChunk;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.tokens.get(self.next)?.clone();
        let delay = if self.next == 0 {
            self.options.initial_delay
        } else {
            self.options.chunk_delay
        };
        self.next += 1;
        Some(StreamChunk { delay, text })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.tokens.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for MockStream {}
