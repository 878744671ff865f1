//! Shared scanning utilities for marker matchers.
//!
//! Matchers classify every candidate open token with a three-way [`Scan`]
//! outcome. Complete and invalid outcomes are decided by characters already
//! in the buffer, so a later, longer buffer never changes them; only
//! [`Scan::Incomplete`] can turn into something else as text arrives.

use crate::core::EntityKind;
use crate::io::find_char_boundary;
use std::ops::Range;

/// Classification of a candidate marker starting at an open token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// The marker closes at `end` (exclusive).
    Complete {
        /// End offset of the close token.
        end: usize,
        /// Payload region in absolute buffer offsets.
        payload: Option<Range<usize>>,
    },
    /// The buffer ended while the marker could still complete.
    Incomplete,
    /// The text is not a marker.
    Invalid,
}

/// An open token a matcher recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenToken {
    /// Literal token text, e.g. `<contactcard` or `【CONTACT:`.
    pub text: String,
    /// Kind the token announces.
    pub kind: EntityKind,
}

impl OpenToken {
    /// Creates an open token.
    #[must_use]
    pub fn new(text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// A located open token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMatch {
    /// Offset of the first byte of the token.
    pub start: usize,
    /// Offset just past the token.
    pub end: usize,
    /// Kind the token announces.
    pub kind: EntityKind,
}

/// Result of matching a literal against the cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eat {
    /// The literal is present and was consumed.
    Matched,
    /// The buffer ends with a proper prefix of the literal.
    Partial,
    /// The text differs from the literal.
    Mismatch,
}

/// Forward-only character cursor over a buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at byte offset `pos`.
    #[must_use]
    pub const fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed text.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Next character, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips `n` bytes; `pos + n` must be a character boundary.
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consumes characters while `pred` holds.
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Consumes whitespace; returns true if a newline was among it.
    pub fn skip_whitespace(&mut self) -> bool {
        let mut newline = false;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            newline |= c == '\n';
            self.pos += c.len_utf8();
        }
        newline
    }

    /// Matches `literal` at the cursor, consuming it on success.
    pub fn eat(&mut self, literal: &str, ignore_case: bool) -> Eat {
        let rest = self.rest().as_bytes();
        let lit = literal.as_bytes();
        let n = rest.len().min(lit.len());
        let same = if ignore_case {
            rest[..n].eq_ignore_ascii_case(&lit[..n])
        } else {
            rest[..n] == lit[..n]
        };
        if !same {
            Eat::Mismatch
        } else if n < lit.len() {
            Eat::Partial
        } else {
            self.pos += lit.len();
            Eat::Matched
        }
    }
}

/// Finds the earliest offset at or after `from` where the buffer ends with a
/// proper prefix of one of `tokens`.
///
/// `is_open_position` filters candidate start offsets (the fenced family
/// only opens at line starts).
pub fn trailing_open_prefix(
    buffer: &str,
    from: usize,
    tokens: &[OpenToken],
    ignore_case: bool,
    is_open_position: impl Fn(&str, usize) -> bool,
) -> Option<(usize, EntityKind)> {
    let longest = tokens.iter().map(|t| t.text.len()).max()?;
    let lower = find_char_boundary(buffer, buffer.len().saturating_sub(longest)).max(from);

    (lower..buffer.len())
        .filter(|&start| buffer.is_char_boundary(start) && is_open_position(buffer, start))
        .find_map(|start| {
            let tail = buffer[start..].as_bytes();
            tokens.iter().find_map(|token| {
                let lit = token.text.as_bytes();
                let prefix = tail.len() < lit.len()
                    && if ignore_case {
                        lit[..tail.len()].eq_ignore_ascii_case(tail)
                    } else {
                        &lit[..tail.len()] == tail
                    };
                prefix.then_some((start, token.kind))
            })
        })
}

/// Extent of an inline JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonExtent {
    /// `close` found outside any string at byte offset `at`.
    Closed {
        /// Offset of the closing delimiter.
        at: usize,
        /// Bracket depth when the delimiter was reached.
        depth: usize,
    },
    /// The buffer ended first.
    Open,
}

/// Scans JSON text from `from` until `close` appears outside a string.
///
/// String literals and escapes are honored, so the closing delimiter may
/// appear inside a JSON string value. Bracket depth is tracked for the
/// decoder's benefit.
#[must_use]
pub fn json_extent(text: &str, from: usize, close: char) -> JsonExtent {
    match walk_json(&text[from..], Some(close)) {
        (Some(at), depth) => JsonExtent::Closed {
            at: from + at,
            depth,
        },
        (None, _) => JsonExtent::Open,
    }
}

/// Bracket depth left open at the end of `text` (strings ignored).
#[must_use]
pub fn open_depth(text: &str) -> usize {
    walk_json(text, None).1
}

fn walk_json(text: &str, close: Option<char>) -> (Option<usize>, usize) {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            c if Some(c) == close => return (Some(i), depth),
            _ => {}
        }
    }
    (None, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<OpenToken> {
        vec![
            OpenToken::new("<contactcard", EntityKind::Contact),
            OpenToken::new("<contact", EntityKind::Contact),
            OpenToken::new("<event", EntityKind::Event),
        ]
    }

    #[test]
    fn test_cursor_eat() {
        let mut cur = Cursor::new("</Contact>", 0);
        assert_eq!(cur.eat("</contact", true), Eat::Matched);
        assert_eq!(cur.peek(), Some('>'));

        let mut cur = Cursor::new("</con", 0);
        assert_eq!(cur.eat("</contact", true), Eat::Partial);
        assert_eq!(cur.pos(), 0);

        let mut cur = Cursor::new("</div>", 0);
        assert_eq!(cur.eat("</contact", true), Eat::Mismatch);

        let mut cur = Cursor::new("</Contact>", 0);
        assert_eq!(cur.eat("</contact", false), Eat::Mismatch);
    }

    #[test]
    fn test_cursor_skip_whitespace() {
        let mut cur = Cursor::new("  \n\tx", 0);
        assert!(cur.skip_whitespace());
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);

        let mut cur = Cursor::new("  x", 0);
        assert!(!cur.skip_whitespace());
    }

    #[test]
    fn test_trailing_open_prefix() {
        let any = |_: &str, _: usize| true;
        assert_eq!(
            trailing_open_prefix("Hi <cont", 0, &tokens(), true, any),
            Some((3, EntityKind::Contact))
        );
        assert_eq!(
            trailing_open_prefix("Hi <", 0, &tokens(), true, any),
            Some((3, EntityKind::Contact))
        );
        assert_eq!(
            trailing_open_prefix("Hi <EV", 0, &tokens(), true, any),
            Some((3, EntityKind::Event))
        );
        assert_eq!(trailing_open_prefix("Hi <b", 0, &tokens(), true, any), None);
        assert_eq!(trailing_open_prefix("Hi", 0, &tokens(), true, any), None);
        // A full token is not a proper prefix of itself.
        assert_eq!(trailing_open_prefix("<event", 0, &tokens(), true, any), None);
    }

    #[test]
    fn test_trailing_open_prefix_respects_from_and_position() {
        let any = |_: &str, _: usize| true;
        assert_eq!(trailing_open_prefix("<con", 1, &tokens(), true, any), None);

        let line_start = |b: &str, s: usize| s == 0 || b[..s].ends_with('\n');
        let fence = vec![OpenToken::new(":::contact", EntityKind::Contact)];
        assert_eq!(trailing_open_prefix("said:", 0, &fence, false, line_start), None);
        assert_eq!(
            trailing_open_prefix("said\n::", 0, &fence, false, line_start),
            Some((5, EntityKind::Contact))
        );
    }

    #[test]
    fn test_trailing_open_prefix_multibyte() {
        let tokens = vec![OpenToken::new("【CONTACT:", EntityKind::Contact)];
        let any = |_: &str, _: usize| true;
        assert_eq!(
            trailing_open_prefix("日本語 【CON", 0, &tokens, false, any),
            Some(("日本語 ".len(), EntityKind::Contact))
        );
    }

    #[test]
    fn test_json_extent_ignores_close_in_strings() {
        let text = r#"{"name":"a】b"}】 tail"#;
        match json_extent(text, 0, '】') {
            JsonExtent::Closed { at, depth } => {
                assert_eq!(&text[..at], r#"{"name":"a】b"}"#);
                assert_eq!(depth, 0);
            }
            JsonExtent::Open => panic!("expected close"),
        }
    }

    #[test]
    fn test_json_extent_escaped_quote() {
        let text = r#"{"q":"say \"hi】\""}】"#;
        assert!(matches!(
            json_extent(text, 0, '】'),
            JsonExtent::Closed { depth: 0, .. }
        ));
    }

    #[test]
    fn test_json_extent_open_and_unbalanced() {
        assert_eq!(json_extent(r#"{"name":"a"#, 0, '】'), JsonExtent::Open);
        assert!(matches!(
            json_extent(r#"{"name":"a"】"#, 0, '】'),
            JsonExtent::Closed { depth: 1, .. }
        ));
    }

    #[test]
    fn test_open_depth() {
        assert_eq!(open_depth(r#"{"a":[1,2]}"#), 0);
        assert_eq!(open_depth(r#"{"a":[1,2"#), 2);
        assert_eq!(open_depth(r#"{"a":"{{"}"#), 0);
    }
}
