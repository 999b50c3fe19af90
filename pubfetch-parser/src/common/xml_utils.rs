//! Text cleanup utilities shared by the PubMed and PMC record assemblers
//!
//! Everything here is a pure function over `&str`; the only shared state is a handful
//! of lazily compiled regexes and the special-character table.

use std::borrow::Cow;
use std::sync::OnceLock;

use quick_xml::escape::resolve_html5_entity;
use regex::Regex;
use tracing::{debug, warn};

/// Upper bound on entity decoding passes for double-escaped text
pub const MAX_DECODE_PASSES: usize = 5;

/// Longest entity name we try to resolve (`&CounterClockwiseContourIntegral;` is 31)
const MAX_ENTITY_LEN: usize = 32;

/// Unicode characters replaced with ASCII equivalents after decoding
const SPECIAL_CHARS: &[(char, &str)] = &[
    ('\u{2009}', " "), // thin space
    ('\u{202f}', " "), // narrow no-break space
    ('\u{2217}', "*"), // asterisk operator
];

fn markup_regex() -> &'static Regex {
    static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKUP_REGEX.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][A-Za-z0-9:_.\-]*(?:\s[^<>]*)?/?>")
            .expect("Failed to compile markup regex")
    })
}

fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]{0,31});")
            .expect("Failed to compile entity regex")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
            .expect("Failed to compile email regex")
    })
}

/// Collapse every whitespace run (including newlines) into a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags such as `<i>`, `</sup>` or `<xref ref-type="bibr">`
///
/// A bare `<` that does not open a tag name (e.g. `p < 0.05`) is left alone.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    let cleaned = markup_regex().replace_all(text, "");
    if let Cow::Owned(ref s) = cleaned {
        debug!(
            original_len = text.len(),
            cleaned_len = s.len(),
            "Stripped markup tags"
        );
    }
    cleaned
}

/// Whether the text still contains something that looks like an entity reference
pub fn contains_entity(text: &str) -> bool {
    entity_regex().is_match(text)
}

/// Decode one level of XML/HTML character entities
///
/// Handles the XML predefined entities, numeric references (`&#169;`, `&#x00A9;`)
/// and the HTML5 named entity table. Unknown or malformed references are preserved
/// as-is.
pub fn decode_entities(content: &str) -> Cow<'_, str> {
    if !content.contains('&') {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        match after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
        {
            Some(end) if is_entity_name(&after[..end]) => {
                match resolve_entity(&after[..end]) {
                    Some(decoded) => result.push_str(&decoded),
                    None => result.push_str(&rest[amp..amp + end + 2]),
                }
                rest = &after[end + 1..];
            }
            _ => {
                result.push('&');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn is_entity_name(name: &str) -> bool {
    match name.strip_prefix('#') {
        Some(num) => match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
            None => !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()),
        },
        None => name.bytes().all(|b| b.is_ascii_alphanumeric()),
    }
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        return code.and_then(char::from_u32).map(String::from);
    }

    match name {
        "amp" => Some("&".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "quot" => Some("\"".to_string()),
        "apos" => Some("'".to_string()),
        other => resolve_html5_entity(other).map(str::to_string),
    }
}

/// Decode entities repeatedly until none remain, at most [`MAX_DECODE_PASSES`] times
///
/// Stops early once a pass changes nothing. When references survive the last pass the
/// partially decoded text is returned and a warning is logged.
pub fn decode_entities_bounded(text: &str) -> String {
    let mut current = text.to_string();

    for pass in 0..MAX_DECODE_PASSES {
        if !contains_entity(&current) {
            return current;
        }
        let decoded = decode_entities(&current);
        if decoded == current {
            debug!(pass, "Entity decoding made no progress");
            break;
        }
        current = decoded.into_owned();
    }

    if contains_entity(&current) {
        warn!(
            max_passes = MAX_DECODE_PASSES,
            "Entities persist after decoding, keeping partially decoded text"
        );
    }
    current
}

/// Replace the special Unicode characters with their ASCII stand-ins
pub fn replace_special_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| SPECIAL_CHARS.iter().any(|(sc, _)| *sc == c)) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match SPECIAL_CHARS.iter().find(|(sc, _)| *sc == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// First email address found in free text (affiliation lines, correspondence notes)
pub fn extract_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}
