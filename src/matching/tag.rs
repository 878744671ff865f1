//! XML-like tag markers.
//!
//! Recognizes `<contactcard name="Jo" email="jo@x.com"></contactcard>` and
//! the self-closing form `<event title="Standup" date="2026-03-01"/>`. Tag
//! names match regardless of ASCII case; the closing tag must repeat the
//! opening name.
//!
//! An open tag stays partial until a `>` outside a double-quoted value
//! arrives, whatever its attributes look like. Malformed attributes are
//! reported by the decoder once the tag closes.

use crate::core::{Entity, EntityKind, Marker, SyntaxMode};
use crate::decode::decode_tag;
use crate::error::PayloadError;
use crate::matching::scan::{Cursor, Eat, OpenMatch, OpenToken, Scan};
use crate::matching::traits::MarkerMatcher;
use regex::Regex;
use std::sync::OnceLock;

/// Matcher for the tag syntax family.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    tokens: Vec<OpenToken>,
}

impl Default for TagMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)]
fn open_regex() -> &'static Regex {
    static OPEN_TAG: OnceLock<Regex> = OnceLock::new();
    OPEN_TAG.get_or_init(|| {
        let mut names: Vec<&str> = EntityKind::all()
            .iter()
            .flat_map(|k| k.spec().tag_names.iter().copied())
            .collect();
        // Longest first so `contactcard` wins over `contact`.
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i)<({alternation})")).expect("valid regex")
    })
}

impl TagMatcher {
    /// Creates a tag matcher for every registered entity kind.
    #[must_use]
    pub fn new() -> Self {
        let tokens = EntityKind::all()
            .iter()
            .flat_map(|&kind| {
                kind.spec()
                    .tag_names
                    .iter()
                    .map(move |name| OpenToken::new(format!("<{name}"), kind))
            })
            .collect();
        Self { tokens }
    }

    /// Finds the `>` ending the open tag, skipping any inside quoted values.
    fn open_tag_end(cur: &mut Cursor<'_>) -> Option<usize> {
        let mut quoted = false;
        while let Some(c) = cur.bump() {
            match c {
                '"' => quoted = !quoted,
                '>' if !quoted => return Some(cur.pos() - 1),
                _ => {}
            }
        }
        None
    }
}

impl MarkerMatcher for TagMatcher {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn syntax(&self) -> SyntaxMode {
        SyntaxMode::Tag
    }

    fn open_tokens(&self) -> &[OpenToken] {
        &self.tokens
    }

    fn case_insensitive(&self) -> bool {
        true
    }

    fn next_open(&self, buffer: &str, from: usize) -> Option<OpenMatch> {
        let re = open_regex();
        let mut pos = from;
        while let Some(caps) = re.captures_at(buffer, pos) {
            let (whole, name) = (caps.get(0)?, caps.get(1)?);
            let boundary = buffer[whole.end()..]
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c == '/' || c == '>');
            if boundary {
                if let Some(kind) = EntityKind::from_tag_name(name.as_str()) {
                    return Some(OpenMatch {
                        start: whole.start(),
                        end: whole.end(),
                        kind,
                    });
                }
            }
            pos = whole.start() + 1;
        }
        None
    }

    fn scan_at(&self, buffer: &str, open: &OpenMatch) -> Scan {
        let mut cur = Cursor::new(buffer, open.end);
        let attrs_start = open.end;

        // Attributes are checked when the payload decodes.
        let Some(gt) = Self::open_tag_end(&mut cur) else {
            return Scan::Incomplete;
        };
        let attrs = buffer[attrs_start..gt].trim_end();
        if attrs.ends_with('/') {
            return Scan::Complete {
                end: gt + 1,
                payload: Some(attrs_start..attrs_start + attrs.len() - 1),
            };
        }

        // Only whitespace may separate the open and close tags.
        cur.skip_whitespace();
        let name = &buffer[open.start + 1..open.end];
        let close = format!("</{name}");
        match cur.eat(&close, true) {
            Eat::Matched => {}
            Eat::Partial => return Scan::Incomplete,
            Eat::Mismatch => return Scan::Invalid,
        }
        cur.skip_whitespace();
        match cur.peek() {
            None => Scan::Incomplete,
            Some('>') => Scan::Complete {
                end: cur.pos() + 1,
                payload: Some(attrs_start..gt),
            },
            Some(_) => Scan::Invalid,
        }
    }

    fn decode(&self, marker: &Marker) -> Result<Entity, PayloadError> {
        decode_tag(marker.kind, marker)
    }

    fn description(&self) -> &'static str {
        "XML-like tags with quoted attributes, e.g. <contactcard name=\"...\"></contactcard>"
    }
}
