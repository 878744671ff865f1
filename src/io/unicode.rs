//! Unicode utilities for text processing.
//!
//! Provides helpers for proper Unicode handling including
//! character boundary detection and log previews.

use unicode_segmentation::UnicodeSegmentation;

/// Finds a valid UTF-8 character boundary at or before the given position.
///
/// # Arguments
///
/// * `s` - The string to search.
/// * `pos` - Target position in bytes.
///
/// # Returns
///
/// A byte position that is a valid UTF-8 character boundary.
///
/// # Examples
///
/// ```
/// use stream_gen::io::find_char_boundary;
///
/// let s = "Hi 【C";
/// assert_eq!(find_char_boundary(s, 3), 3); // Before '【'
/// assert_eq!(find_char_boundary(s, 4), 3); // Middle of '【', backs up
/// ```
#[must_use]
pub const fn find_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let bytes = s.as_bytes();
    let mut boundary = pos;
    // UTF-8 continuation bytes start with 10xxxxxx (0x80-0xBF)
    while boundary > 0 && (bytes[boundary] & 0xC0) == 0x80 {
        boundary -= 1;
    }
    boundary
}

/// Truncates a string at a grapheme cluster boundary.
///
/// Returns a slice containing at most `max_graphemes` grapheme clusters.
#[must_use]
pub fn truncate_graphemes(s: &str, max_graphemes: usize) -> &str {
    let mut end_byte = 0;

    for (count, grapheme) in s.graphemes(true).enumerate() {
        if count >= max_graphemes {
            break;
        }
        end_byte += grapheme.len();
    }

    &s[..end_byte]
}

/// Single-line preview of `s` for log messages.
///
/// Newlines are escaped and the text is cut to `max_graphemes` clusters
/// with a trailing ellipsis.
#[must_use]
pub fn preview(s: &str, max_graphemes: usize) -> String {
    let cut = truncate_graphemes(s, max_graphemes);
    let mut out = cut.replace('\n', "\\n");
    if cut.len() < s.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_char_boundary() {
        let s = "Hello 世界!";
        assert_eq!(find_char_boundary(s, 0), 0);
        assert_eq!(find_char_boundary(s, 6), 6);
        assert_eq!(find_char_boundary(s, 7), 6);
        assert_eq!(find_char_boundary(s, 8), 6);
        assert_eq!(find_char_boundary(s, 9), 9);
        assert_eq!(find_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_find_char_boundary_brackets() {
        let s = "⟦EVENT:";
        assert_eq!(find_char_boundary(s, 1), 0);
        assert_eq!(find_char_boundary(s, 2), 0);
        assert_eq!(find_char_boundary(s, 3), 3);
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("Hello", 3), "Hel");
        assert_eq!(truncate_graphemes("世界!", 2), "世界");
        assert_eq!(truncate_graphemes("Hello", 10), "Hello");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("line one\nline two", 8), "line one…");
        assert_eq!(preview("a\nb", 10), "a\\nb");
    }
}
