//! Contact-signal extractors
//!
//! Every extractor in this module is a plain synchronous function over a
//! parsed [`scraper::Html`] document (or raw text) that returns
//! `Result<T, ExtractError>`. Callers run them through [`isolate`], which also
//! catches panics, so one misbehaving heuristic never takes the others down.

mod email;
pub mod links;
mod obfuscation;
mod social;
mod structured;
pub mod surfaces;

use scraper::{ElementRef, Html, Selector};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

pub use email::{
    extract_emails, EmailFilter, DEFAULT_ASSET_SUFFIXES, DEFAULT_LIKELY_REAL_TLDS,
    DEFAULT_PLACEHOLDER_DOMAINS, DEFAULT_PLACEHOLDER_USERNAMES,
};
pub use obfuscation::{deobfuscate_text, emails_from_obfuscation};
pub use social::{extract_social_media, social_within};
pub use structured::emails_from_json_ld;

/// Errors raised inside a single extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Outcome of running one extractor in isolation
#[derive(Debug)]
pub enum Extraction<T> {
    Found(T),
    Failed {
        extractor: &'static str,
        reason: String,
    },
}

impl<T: Default> Extraction<T> {
    /// The extracted value, or the empty value on failure
    pub fn into_value(self) -> T {
        match self {
            Extraction::Found(value) => value,
            Extraction::Failed { .. } => T::default(),
        }
    }
}

impl<T> Extraction<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Extraction::Failed { .. })
    }
}

/// Runs an extractor, turning both errors and panics into `Extraction::Failed`
pub fn isolate<T, F>(extractor: &'static str, f: F) -> Extraction<T>
where
    F: FnOnce() -> Result<T, ExtractError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Extraction::Found(value),
        Ok(Err(e)) => {
            tracing::debug!("Extractor '{}' failed: {}", extractor, e);
            Extraction::Failed {
                extractor,
                reason: e.to_string(),
            }
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::debug!("Extractor '{}' panicked: {}", extractor, reason);
            Extraction::Failed { extractor, reason }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Parses a CSS selector, mapping the parse error into `ExtractError`
pub(crate) fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// True when a string could hold an address (`@` and `.` both present)
pub(crate) fn may_hold_email(s: &str) -> bool {
    s.contains('@') && s.contains('.')
}

/// Text of every descendant text node outside `<script>`/`<style>`, space-joined
///
/// Joining with a space keeps adjacent block elements from gluing their
/// words together.
pub(crate) fn visible_text(root: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| matches!(el.name(), "script" | "style"))
        });

        if !hidden {
            parts.push(text);
        }
    }

    parts.join(" ")
}

/// The `<body>` element, or the document root when there is none
pub(crate) fn body_or_root(document: &Html) -> ElementRef<'_> {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Appends items not already present, keeping first-seen order
pub(crate) fn push_unique(target: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
