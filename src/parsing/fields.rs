//! Tolerant attribute extraction for single export lines.
//!
//! Export lines look like markup but are never parsed as such. Every lookup
//! is a delimiter-bounded substring search that falls back to an empty
//! string, so a missing or malformed attribute can't fail a record.

use std::borrow::Cow;

/// Returns the text between the first `start` and the next `end` after it.
///
/// - `start` not found: empty string
/// - `end` not found: everything after `start`
///
/// ```
/// use smsxtract::parsing::fields::between;
///
/// assert_eq!(between(r#"ct="image/png" cl="a""#, "ct=\"", "\""), "image/png");
/// assert_eq!(between("no marker here", "ct=\"", "\""), "");
/// assert_eq!(between("text=\"open", "text=\"", "\""), "open");
/// ```
pub fn between<'a>(line: &'a str, start: &str, end: &str) -> &'a str {
    let Some(pos) = line.find(start) else {
        return "";
    };
    let rest = &line[pos + start.len()..];
    rest.find(end).map_or(rest, |stop| &rest[..stop])
}

/// Returns the quoted value of attribute `name`, or `""` if absent.
///
/// Only whole attribute names match: `name` does not pick up
/// `contact_name="..."` and `date` does not pick up `readable_date="..."`.
///
/// ```
/// use smsxtract::parsing::fields::attribute;
///
/// let line = r#"<sms readable_date="Jan 1" date="1000" contact_name="Bob" />"#;
/// assert_eq!(attribute(line, "date"), "1000");
/// assert_eq!(attribute(line, "name"), "");
/// assert_eq!(attribute(line, "contact_name"), "Bob");
/// ```
pub fn attribute<'a>(line: &'a str, name: &str) -> &'a str {
    attribute_until(line, name, "\"")
}

/// Like [`attribute`], but the value runs until `end` instead of the next
/// quote. Falls back to the closing quote when `end` is missing.
///
/// Used for message bodies, which are bounded by the following `toa`
/// attribute so a stray quote inside the text can't cut them short.
pub fn attribute_until<'a>(line: &'a str, name: &str, end: &str) -> &'a str {
    let Some(start) = value_start(line, name) else {
        return "";
    };
    let rest = &line[start..];
    if let Some(stop) = rest.find(end) {
        return &rest[..stop];
    }
    rest.find('"').map_or(rest, |stop| &rest[..stop])
}

/// Byte offset just past `name="` where `name` is a whole attribute name.
fn value_start(line: &str, name: &str) -> Option<usize> {
    let needle = format!("{name}=\"");
    let mut from = 0;

    while let Some(pos) = line[from..].find(&needle) {
        let at = from + pos;
        let whole = line[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if whole {
            return Some(at + needle.len());
        }
        from = at + needle.len();
    }

    None
}

/// Decodes the predefined XML entities and numeric character references.
///
/// Unknown or unterminated references are kept verbatim.
///
/// ```
/// use smsxtract::parsing::fields::unescape;
///
/// assert_eq!(unescape("Fish &amp; chips"), "Fish & chips");
/// assert_eq!(unescape("line&#10;break"), "line\nbreak");
/// assert_eq!(unescape("&#x1F600;"), "\u{1F600}");
/// assert_eq!(unescape("AT&T"), "AT&T");
/// ```
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
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

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
