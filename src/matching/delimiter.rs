//! Bracket-delimited JSON markers.
//!
//! Recognizes `【CONTACT:{"name":"Jo"}】` and `⟦EVENT:{...}⟧`. The payload
//! must start with `{` or `[`; the marker closes at the first matching
//! bracket outside a JSON string.

use crate::core::{Entity, EntityKind, Marker, SyntaxMode};
use crate::decode::decode_json;
use crate::error::{Error, PayloadError, Result};
use crate::matching::scan::{Cursor, JsonExtent, OpenMatch, OpenToken, Scan, json_extent};
use crate::matching::traits::MarkerMatcher;
use regex::Regex;
use std::sync::OnceLock;

/// Bracket pairs recognized by default.
pub const DEFAULT_BRACKETS: [(char, char); 2] = [('【', '】'), ('⟦', '⟧')];

/// Matcher for the delimiter syntax family.
#[derive(Debug, Clone)]
pub struct DelimiterMatcher {
    brackets: Vec<(char, char)>,
    tokens: Vec<OpenToken>,
    open_re: Regex,
}

impl Default for DelimiterMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn open_pattern(brackets: &[(char, char)]) -> String {
    let opens = brackets
        .iter()
        .map(|(open, _)| regex::escape(&open.to_string()))
        .collect::<Vec<_>>()
        .join("|");
    let labels = EntityKind::all()
        .iter()
        .flat_map(|k| k.spec().labels.iter().map(|l| regex::escape(l)))
        .collect::<Vec<_>>()
        .join("|");
    format!("({opens})({labels}):")
}

#[allow(clippy::expect_used)]
fn default_regex() -> &'static Regex {
    static DEFAULT_OPEN: OnceLock<Regex> = OnceLock::new();
    DEFAULT_OPEN.get_or_init(|| Regex::new(&open_pattern(&DEFAULT_BRACKETS)).expect("valid regex"))
}

fn tokens_for(brackets: &[(char, char)]) -> Vec<OpenToken> {
    brackets
        .iter()
        .flat_map(|&(open, _)| {
            EntityKind::all().into_iter().flat_map(move |kind| {
                kind.spec()
                    .labels
                    .iter()
                    .map(move |label| OpenToken::new(format!("{open}{label}:"), kind))
            })
        })
        .collect()
}

impl DelimiterMatcher {
    /// Creates a matcher for the default bracket pairs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            brackets: DEFAULT_BRACKETS.to_vec(),
            tokens: tokens_for(&DEFAULT_BRACKETS),
            open_re: default_regex().clone(),
        }
    }

    /// Creates a matcher for custom bracket pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no pairs are given, or a bracket is
    /// whitespace or a character with meaning inside JSON.
    pub fn with_brackets(brackets: &[(char, char)]) -> Result<Self> {
        if brackets.is_empty() {
            return Err(Error::Config {
                message: "at least one bracket pair is required".to_string(),
            });
        }
        for &(open, close) in brackets {
            for c in [open, close] {
                if c.is_whitespace() || c.is_ascii_alphanumeric() || "{}[]\",:\\".contains(c) {
                    return Err(Error::Config {
                        message: format!("bracket {c:?} cannot delimit a JSON payload"),
                    });
                }
            }
        }
        Ok(Self {
            brackets: brackets.to_vec(),
            tokens: tokens_for(brackets),
            open_re: Regex::new(&open_pattern(brackets))?,
        })
    }

    /// Bracket pairs this matcher recognizes.
    #[must_use]
    pub fn brackets(&self) -> &[(char, char)] {
        &self.brackets
    }

    fn close_for(&self, open: char) -> Option<char> {
        self.brackets
            .iter()
            .find(|(o, _)| *o == open)
            .map(|&(_, close)| close)
    }
}

impl MarkerMatcher for DelimiterMatcher {
    fn name(&self) -> &'static str {
        "delimiter"
    }

    fn syntax(&self) -> SyntaxMode {
        SyntaxMode::Delimiter
    }

    fn open_tokens(&self) -> &[OpenToken] {
        &self.tokens
    }

    fn next_open(&self, buffer: &str, from: usize) -> Option<OpenMatch> {
        let caps = self.open_re.captures_at(buffer, from)?;
        let whole = caps.get(0)?;
        let kind = EntityKind::from_label(caps.get(2)?.as_str())?;
        Some(OpenMatch {
            start: whole.start(),
            end: whole.end(),
            kind,
        })
    }

    fn scan_at(&self, buffer: &str, open: &OpenMatch) -> Scan {
        let Some(close) = buffer[open.start..]
            .chars()
            .next()
            .and_then(|c| self.close_for(c))
        else {
            return Scan::Invalid;
        };

        let mut cur = Cursor::new(buffer, open.end);
        cur.skip_whitespace();
        match cur.peek() {
            None => return Scan::Incomplete,
            Some('{' | '[') => {}
            Some(_) => return Scan::Invalid,
        }

        match json_extent(buffer, cur.pos(), close) {
            JsonExtent::Closed { at, .. } => Scan::Complete {
                end: at + close.len_utf8(),
                payload: Some(open.end..at),
            },
            JsonExtent::Open => Scan::Incomplete,
        }
    }

    fn decode(&self, marker: &Marker) -> std::result::Result<Entity, PayloadError> {
        decode_json(marker.kind, marker)
    }

    fn description(&self) -> &'static str {
        "Bracket-delimited JSON, e.g. 【CONTACT:{\"name\":\"...\"}】"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_marker() {
        let buffer = r#"Here: 【CONTACT:{"name":"Jo","email":"jo@x.com"}】 done"#;
        let scan = DelimiterMatcher::new().scan(buffer, 0);
        assert_eq!(scan.complete.len(), 1);
        let marker = &scan.complete[0];
        assert_eq!(marker.kind, EntityKind::Contact);
        assert_eq!(marker.payload(), Some(r#"{"name":"Jo","email":"jo@x.com"}"#));
        assert!(scan.partial.is_none());
    }

    #[test]
    fn test_labels_and_alternate_brackets() {
        let buffer = r#"⟦CALENDAR:{"title":"A","date":"B"}⟧ 【EVENT:{"title":"C","date":"D"}】"#;
        let scan = DelimiterMatcher::new().scan(buffer, 0);
        assert_eq!(scan.complete.len(), 2);
        assert!(scan.complete.iter().all(|m| m.kind == EntityKind::Event));
    }

    #[test]
    fn test_close_bracket_inside_string() {
        let buffer = r#"【CONTACT:{"name":"Jo】Li"}】"#;
        let scan = DelimiterMatcher::new().scan(buffer, 0);
        assert_eq!(scan.complete.len(), 1);
        assert_eq!(scan.complete[0].raw, buffer);
    }

    #[test]
    fn test_mismatched_bracket_does_not_close() {
        let buffer = r#"⟦CONTACT:{"name":"Jo"}】"#;
        let scan = DelimiterMatcher::new().scan(buffer, 0);
        assert!(scan.complete.is_empty());
        assert_eq!(scan.partial.unwrap().start(), 0);
    }

    #[test]
    fn test_prose_after_label_is_not_a_marker() {
        let buffer = "【CONTACT: see below】 and more";
        let scan = DelimiterMatcher::new().scan(buffer, 0);
        assert!(scan.complete.is_empty());
        assert!(scan.partial.is_none());
    }

    #[test]
    fn test_every_prefix_is_partial_until_complete() {
        let full = r#"ok 【EVENT:{"title":"Sync","date":"Mon"}】"#;
        let matcher = DelimiterMatcher::new();
        let start = "ok ".len();
        let mut end = start + 1;
        while end < full.len() {
            if full.is_char_boundary(end) {
                let scan = matcher.scan(&full[..end], 0);
                assert!(scan.complete.is_empty(), "complete at {end}");
                assert_eq!(scan.partial.map(|p| p.start()), Some(start), "at {end}");
            }
            end += 1;
        }
    }

    #[test]
    fn test_unbalanced_payload_fails_decode() {
        let buffer = r#"【CONTACT:{"name":"Jo"】"#;
        let matcher = DelimiterMatcher::new();
        let marker = matcher.find_complete(buffer, 0).remove(0);
        assert_eq!(
            matcher.decode(&marker),
            Err(PayloadError::Unbalanced { depth: 1 })
        );
    }

    #[test]
    fn test_with_brackets() {
        let matcher = DelimiterMatcher::with_brackets(&[('«', '»')]).unwrap();
        let scan = matcher.scan(r#"«CONTACT:{"name":"Jo"}»"#, 0);
        assert_eq!(scan.complete.len(), 1);
        assert_eq!(matcher.brackets(), &[('«', '»')]);

        assert!(DelimiterMatcher::with_brackets(&[('(', '}')]).is_err());
        assert!(DelimiterMatcher::with_brackets(&[]).is_err());
    }
}
