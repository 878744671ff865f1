//! Tag attribute decoding.

use crate::core::{Entity, EntityKind, Fields, Marker};
use crate::error::PayloadError;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*"([^"]*)""#).expect("valid regex")
    })
}

/// Parses `name="value"` pairs from a tag's attribute region.
///
/// Values are entity-unescaped.
///
/// # Errors
///
/// Returns [`PayloadError::MalformedAttributes`] if anything other than
/// whitespace and well-formed pairs remains, or if a name repeats.
pub fn parse_attributes(region: &str) -> Result<Fields, PayloadError> {
    let mut fields = Fields::new();
    let mut last = 0;

    for caps in attribute_regex().captures_iter(region) {
        let (Some(whole), Some(name), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        check_gap(&region[last..whole.start()])?;
        let previous = fields.insert(
            name.as_str().to_string(),
            unescape_entities(value.as_str()).into_owned(),
        );
        if previous.is_some() {
            return Err(PayloadError::MalformedAttributes {
                reason: format!("duplicate attribute \"{}\"", name.as_str()),
            });
        }
        last = whole.end();
    }
    check_gap(&region[last..])?;
    Ok(fields)
}

fn check_gap(gap: &str) -> Result<(), PayloadError> {
    let stray = gap.trim();
    if stray.is_empty() {
        Ok(())
    } else {
        Err(PayloadError::MalformedAttributes {
            reason: format!("unexpected text \"{stray}\""),
        })
    }
}

/// Replaces XML character references with the characters they stand for.
///
/// Handles the five predefined entities and numeric references. Unknown
/// references are left untouched.
#[must_use]
pub fn unescape_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| Some((resolve(&tail[1..semi])?, semi))) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// Decodes a tag marker into an entity.
///
/// # Errors
///
/// Returns [`PayloadError::MissingPayload`] if the marker has no attribute
/// region, [`PayloadError::MalformedAttributes`] if it cannot be read, and
/// validation errors from [`Entity::new`].
pub fn decode_tag(kind: EntityKind, marker: &Marker) -> Result<Entity, PayloadError> {
    let region = marker.payload().ok_or(PayloadError::MissingPayload)?;
    let fields = parse_attributes(region)?;
    Entity::new(kind, fields, marker.clone())
}
