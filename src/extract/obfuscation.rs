//! Decoders for addresses that sites deliberately disguise
//!
//! Covers `data-email` attributes, addresses assembled in inline scripts,
//! numeric HTML entities and the textual `[at]`/`[dot]` spellings.

use super::email::EmailFilter;
use super::{body_or_root, may_hold_email, parse_selector, push_unique, visible_text, ExtractError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static AT_BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[\[(]\s*at\s*[\])]\s*").expect("at bracket regex"));

static AT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+at\s+").expect("at word regex"));

static DOT_BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[\[(]\s*dot\s*[\])]\s*").expect("dot bracket regex"));

static DOT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+dot\s+").expect("dot word regex"));

/// `"local@domain.tld"` string literals in script source
static SCRIPT_LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"@]+@[^"]+\.[^"]+)""#).expect("script literal regex"));

/// The `' + '` glue between concatenated string literals
static CONCAT_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]\s*\+\s*['"]"#).expect("concat join regex"));

/// Rewrites `name [at] company [dot] com` into `name@company.com`
///
/// Returns `None` unless the text carries both an "at" and a "dot" marker.
/// The surrounding whitespace is consumed along with each marker.
///
/// # Examples
///
/// ```
/// use contact_scout::extract::deobfuscate_text;
///
/// assert_eq!(
///     deobfuscate_text("name [at] company [dot] com").as_deref(),
///     Some("name@company.com")
/// );
/// assert_eq!(deobfuscate_text("meet at noon"), None);
/// ```
pub fn deobfuscate_text(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let has_at = lower.contains("[at]") || lower.contains("(at)") || AT_WORD_RE.is_match(text);
    let has_dot =
        lower.contains("[dot]") || lower.contains("(dot)") || DOT_WORD_RE.is_match(text);

    if !has_at || !has_dot {
        return None;
    }

    let text = AT_BRACKET_RE.replace_all(text, "@");
    let text = AT_WORD_RE.replace_all(&text, "@");
    let text = DOT_BRACKET_RE.replace_all(&text, ".");
    let text = DOT_WORD_RE.replace_all(&text, ".");
    Some(text.into_owned())
}

/// Emails from every obfuscation technique this module knows
pub fn emails_from_obfuscation(
    document: &Html,
    raw_html: &str,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let mut emails = Vec::new();
    push_unique(&mut emails, from_data_email(document, filter)?);
    push_unique(&mut emails, from_scripts(document, filter)?);
    push_unique(&mut emails, from_numeric_entities(raw_html, filter));
    push_unique(&mut emails, from_spelled_out(document, filter));
    Ok(emails)
}

/// `data-email` attributes: base64 first, then the raw value
fn from_data_email(document: &Html, filter: &EmailFilter) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector("[data-email]")?;
    let mut emails = Vec::new();

    for element in document.select(&selector) {
        let Some(encoded) = element.value().attr("data-email") else {
            continue;
        };

        let decoded = STANDARD
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|s| may_hold_email(s));

        match decoded {
            Some(decoded) => push_unique(&mut emails, filter.extract(&decoded)),
            None if may_hold_email(encoded) => push_unique(&mut emails, filter.extract(encoded)),
            None => {}
        }
    }

    Ok(emails)
}

/// Inline scripts: quoted literals and literals joined with `+`
fn from_scripts(document: &Html, filter: &EmailFilter) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector("script")?;
    let mut emails = Vec::new();

    for element in document.select(&selector) {
        let source: String = element.text().collect();
        if source.is_empty() {
            continue;
        }

        for caps in SCRIPT_LITERAL_RE.captures_iter(&source) {
            if let Some(literal) = caps.get(1) {
                push_unique(&mut emails, filter.extract(literal.as_str()));
            }
        }

        if CONCAT_JOIN_RE.is_match(&source) {
            let joined = CONCAT_JOIN_RE.replace_all(&source, "");
            if joined.contains('@') {
                push_unique(&mut emails, filter.extract(&joined));
            }
        }
    }

    Ok(emails)
}

/// Raw markup with `&#64;`-style entities decoded
fn from_numeric_entities(raw_html: &str, filter: &EmailFilter) -> Vec<String> {
    if !raw_html.contains("&#") {
        return Vec::new();
    }

    let decoded = html_escape::decode_html_entities(raw_html);
    filter.extract(&decoded)
}

/// Body text with the `[at]`/`[dot]` spellings rewritten
fn from_spelled_out(document: &Html, filter: &EmailFilter) -> Vec<String> {
    let text = visible_text(body_or_root(document));
    match deobfuscate_text(&text) {
        Some(rewritten) => filter.extract(&rewritten),
        None => Vec::new(),
    }
}
