//! # stream-gen
//!
//! Incremental entity extraction for streamed chat replies.
//!
//! A model's reply arrives in chunks and may embed structured entities
//! (contact cards, calendar events) using one of three marker syntaxes:
//!
//! - **Tag**: `<contactcard name="Jo" email="jo@example.com"></contactcard>`
//! - **Delimiter**: `【CONTACT:{"name":"Jo"}】`
//! - **Fenced**: a `:::contact` line, a `json` code fence, then `:::`
//!
//! After every chunk the accumulated buffer is split into prose and
//! entity segments. A marker that has not closed yet is withheld instead
//! of being shown as raw markup, and segments already produced never
//! change as more text arrives.
//!
//! ## Features
//!
//! - **Matchers**: one per syntax family, behind the [`MarkerMatcher`] trait
//! - **Segmentation**: stateless [`Segmenter`] with configurable policies
//! - **Streaming**: [`StreamSession`] driver, mock generator and wire lines
//! - **Unicode Aware**: byte offsets on char boundaries, grapheme-safe previews
//!
//! ```
//! use stream_gen::{StreamSession, SyntaxMode};
//!
//! let mut session = StreamSession::for_syntax(SyntaxMode::Tag);
//! session.push("Reach <contactcard name=\"Jo\"").unwrap();
//! let result = session.push("></contactcard> today").unwrap();
//! let contact = result.entities().next().and_then(|e| e.as_contact()).unwrap();
//! assert_eq!(contact.name, "Jo");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod decode;
pub mod error;
pub mod io;
pub mod matching;
pub mod segment;
pub mod stream;

// Re-export commonly used types at crate root
pub use error::{Error, PayloadError, Result};

// Re-export core domain types
pub use core::{
    CalendarEvent, Completeness, Contact, Diagnostic, Entity, EntityKind, Fields, Marker,
    ParseResult, Segment, SyntaxMode,
};

// Re-export matching types
pub use matching::{
    DelimiterMatcher, FencedMatcher, MarkerMatcher, TagMatcher, available_syntaxes,
    create_matcher,
};

// Re-export segmentation types
pub use segment::{
    DecodeFailurePolicy, Segmenter, SegmenterConfig, WhitespacePolicy, segment, segment_finished,
};

// Re-export streaming types
pub use stream::{MockStream, MockStreamOptions, Preset, StreamSession, WirePart};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
