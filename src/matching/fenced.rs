//! Fenced-block JSON markers.
//!
//! Recognizes a sentinel line, a `json` code fence and a closing sentinel:
//!
//! ````text
//! :::contact
//! ```json
//! {"name": "Jo"}
//! ```
//! :::
//! ````
//!
//! The opening sentinel must start a line.

use crate::core::{Entity, EntityKind, Marker, SyntaxMode};
use crate::decode::decode_json;
use crate::error::PayloadError;
use crate::matching::scan::{Cursor, Eat, OpenMatch, OpenToken, Scan};
use crate::matching::traits::MarkerMatcher;
use regex::Regex;
use std::sync::OnceLock;

const SENTINEL: &str = ":::";
const FENCE: &str = "```";
const INFO: &str = "json";

/// Matcher for the fenced syntax family.
#[derive(Debug, Clone)]
pub struct FencedMatcher {
    tokens: Vec<OpenToken>,
}

impl Default for FencedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)]
fn open_regex() -> &'static Regex {
    static OPEN_FENCE: OnceLock<Regex> = OnceLock::new();
    OPEN_FENCE.get_or_init(|| {
        let names = EntityKind::all()
            .iter()
            .flat_map(|k| k.spec().fence_names.iter().map(|n| regex::escape(n)))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?m)^{SENTINEL}({names})")).expect("valid regex")
    })
}

/// Returns true if `info` could still grow into an accepted info string.
fn info_prefix(info: &str) -> bool {
    info.len() <= INFO.len() && INFO[..info.len()].eq_ignore_ascii_case(info)
}

impl FencedMatcher {
    /// Creates a fenced matcher for every registered entity kind.
    #[must_use]
    pub fn new() -> Self {
        let tokens = EntityKind::all()
            .iter()
            .flat_map(|&kind| {
                kind.spec()
                    .fence_names
                    .iter()
                    .map(move |name| OpenToken::new(format!("{SENTINEL}{name}"), kind))
            })
            .collect();
        Self { tokens }
    }

    /// Consumes the fence info string line. Only empty or `json` is accepted.
    fn scan_info(cur: &mut Cursor<'_>) -> Result<(), Scan> {
        let rest = cur.rest();
        match rest.find('\n') {
            None if info_prefix(rest.trim()) => Err(Scan::Incomplete),
            None => Err(Scan::Invalid),
            Some(i) => {
                let info = rest[..i].trim();
                if info.is_empty() || info.eq_ignore_ascii_case(INFO) {
                    cur.advance(i + 1);
                    Ok(())
                } else {
                    Err(Scan::Invalid)
                }
            }
        }
    }

    /// Consumes body lines up to and including the closing code fence.
    ///
    /// Returns the offset where the closing fence line starts.
    fn scan_body(cur: &mut Cursor<'_>) -> Result<usize, Scan> {
        loop {
            let line_start = cur.pos();
            let rest = cur.rest();
            let Some(i) = rest.find('\n') else {
                return Err(Scan::Incomplete);
            };
            let is_fence = rest[..i].trim() == FENCE;
            cur.advance(i + 1);
            if is_fence {
                return Ok(line_start);
            }
        }
    }
}

impl MarkerMatcher for FencedMatcher {
    fn name(&self) -> &'static str {
        "fenced"
    }

    fn syntax(&self) -> SyntaxMode {
        SyntaxMode::Fenced
    }

    fn open_tokens(&self) -> &[OpenToken] {
        &self.tokens
    }

    fn is_open_position(&self, buffer: &str, start: usize) -> bool {
        start == 0 || buffer[..start].ends_with('\n')
    }

    fn next_open(&self, buffer: &str, from: usize) -> Option<OpenMatch> {
        let re = open_regex();
        let mut pos = from;
        while let Some(caps) = re.captures_at(buffer, pos) {
            let (whole, name) = (caps.get(0)?, caps.get(1)?);
            let boundary = buffer[whole.end()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace);
            if boundary {
                if let Some(kind) = EntityKind::from_fence_name(name.as_str()) {
                    return Some(OpenMatch {
                        start: whole.start(),
                        end: whole.end(),
                        kind,
                    });
                }
            }
            pos = whole.end();
        }
        None
    }

    fn scan_at(&self, buffer: &str, open: &OpenMatch) -> Scan {
        let mut cur = Cursor::new(buffer, open.end);

        // The sentinel line holds nothing else.
        let newline = cur.skip_whitespace();
        if cur.peek().is_none() {
            return Scan::Incomplete;
        }
        if !newline {
            return Scan::Invalid;
        }

        match cur.eat(FENCE, false) {
            Eat::Matched => {}
            Eat::Partial => return Scan::Incomplete,
            Eat::Mismatch => return Scan::Invalid,
        }
        if let Err(scan) = Self::scan_info(&mut cur) {
            return scan;
        }

        let body_start = cur.pos();
        let fence_start = match Self::scan_body(&mut cur) {
            Ok(at) => at,
            Err(scan) => return scan,
        };

        cur.skip_whitespace();
        match cur.eat(SENTINEL, false) {
            Eat::Matched => Scan::Complete {
                end: cur.pos(),
                payload: Some(body_start..fence_start),
            },
            Eat::Partial => Scan::Incomplete,
            Eat::Mismatch => Scan::Invalid,
        }
    }

    fn decode(&self, marker: &Marker) -> Result<Entity, PayloadError> {
        decode_json(marker.kind, marker)
    }

    fn description(&self) -> &'static str {
        "Fenced JSON blocks opened by :::contact or :::event and closed by :::"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const CONTACT: &str = ":::contact\n```json\n{\"name\": \"Jo\", \"phone\": \"555\"}\n```\n:::";

    fn scan_one(buffer: &str) -> Scan {
        let matcher = FencedMatcher::new();
        let open = matcher.next_open(buffer, 0).unwrap();
        matcher.scan_at(buffer, &open)
    }

    #[test]
    fn test_complete_block() {
        let buffer = format!("Saved it:\n{CONTACT}\nAnything else?");
        let scan = FencedMatcher::new().scan(&buffer, 0);
        assert_eq!(scan.complete.len(), 1);
        let marker = &scan.complete[0];
        assert_eq!(marker.raw, CONTACT);
        assert_eq!(marker.payload(), Some("{\"name\": \"Jo\", \"phone\": \"555\"}\n"));
        assert!(scan.partial.is_none());
    }

    #[test]
    fn test_bare_fence_and_crlf() {
        let buffer = ":::event\r\n```\r\n{\"title\":\"A\",\"date\":\"B\"}\r\n```\r\n:::";
        assert!(matches!(scan_one(buffer), Scan::Complete { .. }));
    }

    #[test]
    fn test_sentinel_must_start_line() {
        let matcher = FencedMatcher::new();
        assert!(matcher.next_open("see :::contact\n", 0).is_none());
        assert!(!matcher.is_open_position("ab:", 2));
        assert!(matcher.is_open_position("ab\n:", 3));
    }

    #[test_case(":::contact extra\n```json\n{}\n```\n:::"; "text after sentinel")]
    #[test_case(":::contact\n```yaml\nname: Jo\n```\n:::"; "wrong info string")]
    #[test_case(":::contact\nno fence\n"; "missing fence")]
    #[test_case(":::contact\n```json\n{}\n```\nbye"; "missing close sentinel")]
    fn test_invalid_blocks(buffer: &str) {
        assert_eq!(scan_one(buffer), Scan::Invalid);
    }

    #[test]
    fn test_every_prefix_is_partial_until_complete() {
        let full = format!("Intro\n{CONTACT}");
        let start = "Intro\n".len();
        let matcher = FencedMatcher::new();
        for end in start + 1..full.len() {
            let scan = matcher.scan(&full[..end], 0);
            assert!(scan.complete.is_empty(), "complete at {end}");
            assert_eq!(scan.partial.map(|p| p.start()), Some(start), "at {end}");
        }
        assert_eq!(matcher.scan(&full, 0).complete.len(), 1);
    }

    #[test]
    fn test_decode() {
        let matcher = FencedMatcher::new();
        let marker = matcher.find_complete(CONTACT, 0).remove(0);
        let entity = matcher.decode(&marker).unwrap();
        assert_eq!(entity.get("name"), Some("Jo"));
        assert_eq!(entity.get("phone"), Some("555"));
    }
}
