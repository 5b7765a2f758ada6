use super::email::EmailFilter;
use super::{may_hold_email, parse_selector, push_unique, ExtractError};
use scraper::Html;
use serde_json::Value;

/// Keys (compared lower-cased) whose string values are scanned for addresses
const EMAIL_KEYS: &[&str] = &[
    "email",
    "emailaddress",
    "contactpoint",
    "contactemail",
    "authoremail",
];

/// Emails from `<script type="application/ld+json">` blocks
///
/// Each block is parsed as JSON. On success the serialized document is
/// scanned, then a depth-limited visitor checks the well-known email keys.
/// Blocks that fail to parse are scanned as plain text.
pub fn emails_from_json_ld(
    document: &Html,
    filter: &EmailFilter,
    depth_limit: usize,
) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector(r#"script[type="application/ld+json"]"#)?;
    let mut emails = Vec::new();

    for element in document.select(&selector) {
        let content: String = element.text().collect();

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => {
                let serialized = value.to_string();
                if may_hold_email(&serialized) {
                    push_unique(&mut emails, filter.extract(&serialized));
                }
                visit(&value, filter, 0, depth_limit, &mut emails);
            }
            Err(e) => {
                tracing::trace!("JSON-LD block did not parse, scanning as text: {}", e);
                if may_hold_email(&content) {
                    push_unique(&mut emails, filter.extract(&content));
                }
            }
        }
    }

    Ok(emails)
}

fn visit(value: &Value, filter: &EmailFilter, depth: usize, limit: usize, out: &mut Vec<String>) {
    if depth >= limit {
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if let Value::String(s) = child {
                    let key = key.to_lowercase();
                    if EMAIL_KEYS.contains(&key.as_str()) && may_hold_email(s) {
                        // schema.org often writes "mailto:jane@acme.io"
                        let s = s.strip_prefix("mailto:").unwrap_or(s);
                        push_unique(out, filter.extract(s));
                    }
                } else {
                    visit(child, filter, depth + 1, limit, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                visit(item, filter, depth + 1, limit, out);
            }
        }
        _ => {}
    }
}
