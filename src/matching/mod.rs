//! Marker matchers for stream-gen.
//!
//! This module provides a trait-based system for recognizing entity markers
//! in streamed text. Three syntax families are available:
//!
//! - **Tag**: XML-like tags with quoted attributes
//! - **Delimiter**: bracket-delimited inline JSON
//! - **Fenced**: sentinel lines around a `json` code fence

pub mod delimiter;
pub mod fenced;
pub mod scan;
pub mod tag;
pub mod traits;

pub use delimiter::{DEFAULT_BRACKETS, DelimiterMatcher};
pub use fenced::FencedMatcher;
pub use scan::{OpenMatch, OpenToken, Scan};
pub use tag::TagMatcher;
pub use traits::{MarkerMatcher, MatchScan};

use crate::core::SyntaxMode;
use crate::error::Result;

/// Creates the matcher for a syntax family.
#[must_use]
pub fn create_matcher(syntax: SyntaxMode) -> Box<dyn MarkerMatcher> {
    match syntax {
        SyntaxMode::Tag => Box::new(TagMatcher::new()),
        SyntaxMode::Delimiter => Box::new(DelimiterMatcher::new()),
        SyntaxMode::Fenced => Box::new(FencedMatcher::new()),
    }
}

/// Creates a matcher by syntax name.
///
/// # Errors
///
/// Returns [`crate::error::Error::Config`] if the name is not recognized.
pub fn create_matcher_by_name(name: &str) -> Result<Box<dyn MarkerMatcher>> {
    SyntaxMode::parse(name).map(create_matcher)
}

/// Lists available syntax family names.
#[must_use]
pub fn available_syntaxes() -> Vec<&'static str> {
    SyntaxMode::all().iter().map(|s| s.name()).collect()
}
