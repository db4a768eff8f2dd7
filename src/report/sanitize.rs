// Text sanitizer - escapes characters that would corrupt XML markup
//
// Names and condition strings come from arbitrary source identifiers, so every
// free-text value is passed through here before it is embedded in a report.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

const ENTITY_PATTERN: &str =
    r"^&(?:amp|lt|gt|quot|apos|#([0-9]{1,7})|#x([0-9A-Fa-f]{1,6}));";

static ENTITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(ENTITY_PATTERN).expect("invalid entity regex"));

/// Characters allowed in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Whether `rest` opens an entity a parser will accept.
///
/// Character references must name a legal XML character.
fn opens_entity(rest: &str) -> bool {
    let Some(caps) = ENTITY_REGEX.captures(rest) else {
        return false;
    };
    let code = match (caps.get(1), caps.get(2)) {
        (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
        (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
        (None, None) => return true,
    };
    code.and_then(char::from_u32).is_some_and(is_xml_char)
}

/// Replacement for one character, or `None` to keep it as is.
///
/// `rest` is the input starting at `c`; an `&` that already opens a
/// well-formed entity is kept so escaping never doubles up.
fn replacement(c: char, rest: &str) -> Option<&'static str> {
    match c {
        '&' if opens_entity(rest) => None,
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        '\t' | '\n' | '\r' => None,
        c if (c as u32) < 0x20 => Some("\u{FFFD}"),
        _ => None,
    }
}

/// Exact length in bytes of `raw` once escaped
pub fn translated_len(raw: &str) -> usize {
    raw.char_indices()
        .map(|(i, c)| match replacement(c, &raw[i..]) {
            Some(r) => r.len(),
            None => c.len_utf8(),
        })
        .sum()
}

/// Append the escaped form of `raw` to `out`
pub fn translate_into(raw: &str, out: &mut String) {
    for (i, c) in raw.char_indices() {
        match replacement(c, &raw[i..]) {
            Some(r) => out.push_str(r),
            None => out.push(c),
        }
    }
}

/// Escape `raw`, borrowing it when nothing needs escaping
pub fn escape(raw: &str) -> Cow<'_, str> {
    let unchanged = raw
        .char_indices()
        .all(|(i, c)| replacement(c, &raw[i..]).is_none());
    if unchanged {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(translated_len(raw));
    translate_into(raw, &mut out);
    Cow::Owned(out)
}

/// Reusable scratch buffer for repeated escaping.
///
/// The buffer only grows: it is reallocated when a value needs more room
/// than the current capacity and reused otherwise.
#[derive(Debug, Default)]
pub struct Sanitizer {
    scratch: String,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape `raw` into the scratch buffer and return it
    pub fn sanitize(&mut self, raw: &str) -> &str {
        let needed = translated_len(raw);
        self.scratch.clear();
        if needed > self.scratch.capacity() {
            self.scratch.reserve(needed);
        }
        translate_into(raw, &mut self.scratch);
        &self.scratch
    }

    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }
}
