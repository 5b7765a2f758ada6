//! The page locations scanned for email addresses
//!
//! Each function covers one surface and feeds what it finds through the
//! shared [`EmailFilter`].

use super::email::EmailFilter;
use super::{may_hold_email, parse_selector, push_unique, social_within, ExtractError};
use crate::model::SocialHandles;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--([\s\S]*?)-->").expect("html comment regex"));

/// Elements that commonly carry contact details
pub const CONTACT_SELECTORS: &[&str] = &[
    r#"a[href^="mailto:"]"#,
    ".contact",
    ".contact-info",
    ".email",
    ".email-address",
    "#contact",
    "#email",
    r#"[class*="contact"]"#,
    r#"[class*="email"]"#,
    r#"[id*="contact"]"#,
    r#"[id*="email"]"#,
    ".vcard",
    ".hcard",
    ".author",
    ".byline",
    ".signature",
    ".bio",
    ".profile",
    ".about-author",
    ".team-member",
    ".staff",
    ".employee",
];

pub const FOOTER_SELECTORS: &[&str] = &[
    "footer",
    ".footer",
    "#footer",
    r#"[class*="footer"]"#,
    ".bottom",
    ".bottom-bar",
    ".copyright",
    ".site-info",
];

const HIDDEN_SELECTOR: &str = r#"[style*="display:none"], [style*="display: none"], [style*="visibility:hidden"], [style*="visibility: hidden"], [hidden], .hidden"#;

const CONTACT_FORM_SELECTOR: &str = r#"form[action*="contact"], form[action*="email"], form[id*="contact"], form[class*="contact"], form[id*="email"], form[class*="email"]"#;

/// Query values and the decoded path of the crawled URL itself
pub fn from_url(url: &Url, filter: &EmailFilter) -> Vec<String> {
    let mut emails = Vec::new();

    for (_, value) in url.query_pairs() {
        if may_hold_email(&value) {
            push_unique(&mut emails, filter.extract(&value));
        }
    }

    let path = url.path();
    let decoded = urlencoding::decode(path)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| path.to_string());
    if may_hold_email(&decoded) {
        push_unique(&mut emails, filter.extract(&decoded));
    }

    emails
}

/// Inline `style` attributes and `<style>` blocks after CSS-escape decoding
pub fn from_styles(document: &Html, filter: &EmailFilter) -> Result<Vec<String>, ExtractError> {
    let mut emails = Vec::new();

    let styled = parse_selector("[style]")?;
    for element in document.select(&styled) {
        if let Some(style) = element.value().attr("style") {
            scan_css(style, filter, &mut emails);
        }
    }

    let blocks = parse_selector("style")?;
    for element in document.select(&blocks) {
        let css: String = element.text().collect();
        scan_css(&css, filter, &mut emails);
    }

    Ok(emails)
}

/// Only CSS with a `content` property can render an address
fn scan_css(css: &str, filter: &EmailFilter, out: &mut Vec<String>) {
    if !css.contains("content") || !(css.contains('@') || css.contains("\\0040")) {
        return;
    }

    push_unique(out, filter.extract(&decode_css_escapes(css)));
}

pub fn decode_css_escapes(css: &str) -> String {
    css.replace("\\0040", "@")
        .replace("\\002e", ".")
        .replace("\\002E", ".")
        .replace("\\002f", "/")
        .replace("\\002F", "/")
}

/// `data-*` attribute values, with base64 and URL decoding on mail-ish names
pub fn from_data_attributes(
    document: &Html,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let all = parse_selector("*")?;
    let mut emails = Vec::new();

    for element in document.select(&all) {
        for (name, value) in element.value().attrs() {
            if !name.starts_with("data-") {
                continue;
            }

            if may_hold_email(value) {
                push_unique(&mut emails, filter.extract(value));
            }

            if !(name.contains("email") || name.contains("contact") || name.contains("mail")) {
                continue;
            }

            let from_base64 = STANDARD
                .decode(value.trim())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok());
            if let Some(decoded) = from_base64.filter(|d| may_hold_email(d)) {
                push_unique(&mut emails, filter.extract(&decoded));
            }

            if let Ok(decoded) = urlencoding::decode(value) {
                if decoded != value && may_hold_email(&decoded) {
                    push_unique(&mut emails, filter.extract(&decoded));
                }
            }
        }
    }

    Ok(emails)
}

/// HTML comments, visually hidden elements and `<noscript>` content
pub fn from_hidden_content(
    document: &Html,
    raw_html: &str,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let mut emails = Vec::new();
    let worth_scanning = |s: &str| s.contains('@') || s.contains(" at ");

    for caps in COMMENT_RE.captures_iter(raw_html) {
        if let Some(body) = caps.get(1) {
            if worth_scanning(body.as_str()) {
                push_unique(&mut emails, filter.extract(body.as_str()));
            }
        }
    }

    let hidden = parse_selector(HIDDEN_SELECTOR)?;
    for element in document.select(&hidden) {
        let text: String = element.text().collect();
        if worth_scanning(&text) {
            push_unique(&mut emails, filter.extract(&text));
        }
    }

    let noscript = parse_selector("noscript")?;
    for element in document.select(&noscript) {
        let content = element.inner_html();
        if worth_scanning(&content) {
            push_unique(&mut emails, filter.extract(&content));
        }
    }

    Ok(emails)
}

/// `<meta content>` values, which include OpenGraph, Twitter cards and `itemprop`
pub fn from_meta_tags(document: &Html, filter: &EmailFilter) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector("meta[content]")?;
    let mut emails = Vec::new();

    for element in document.select(&selector) {
        if let Some(content) = element.value().attr("content") {
            if may_hold_email(content) {
                push_unique(&mut emails, filter.extract(content));
            }
        }
    }

    Ok(emails)
}

/// `alt`, `aria-label` and `title` attributes
pub fn from_accessibility(
    document: &Html,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let mut emails = Vec::new();

    for (css, attr) in [
        ("img[alt]", "alt"),
        ("[aria-label]", "aria-label"),
        ("[title]", "title"),
    ] {
        let selector = parse_selector(css)?;
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if may_hold_email(value) {
                    push_unique(&mut emails, filter.extract(value));
                }
            }
        }
    }

    Ok(emails)
}

/// Hidden and prefilled inputs of contact-looking forms
pub fn from_contact_forms(
    document: &Html,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let forms = parse_selector(CONTACT_FORM_SELECTOR)?;
    let hidden_inputs = parse_selector(r#"input[type="hidden"]"#)?;
    let visible_inputs = parse_selector(r#"input[type="text"], input[type="email"]"#)?;
    let mut emails = Vec::new();

    for form in document.select(&forms) {
        for input in form.select(&hidden_inputs) {
            if let Some(value) = input.value().attr("value").filter(|v| may_hold_email(v)) {
                push_unique(&mut emails, filter.extract(value));
            }
        }

        for input in form.select(&visible_inputs) {
            for attr in ["value", "placeholder"] {
                if let Some(value) = input.value().attr(attr).filter(|v| may_hold_email(v)) {
                    push_unique(&mut emails, filter.extract(value));
                }
            }
        }
    }

    Ok(emails)
}

/// Email inputs on a dedicated contact page (value and placeholder)
pub fn from_email_inputs(
    document: &Html,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector(
        r#"input[type="email"], input[name*="email"], input[placeholder*="email"]"#,
    )?;
    let mut emails = Vec::new();

    for input in document.select(&selector) {
        for attr in ["placeholder", "value"] {
            if let Some(value) = input.value().attr(attr).filter(|v| may_hold_email(v)) {
                push_unique(&mut emails, filter.extract(value));
            }
        }
    }

    Ok(emails)
}

/// Text of every element matched by `css`, for the selectors passed in
pub fn from_element_text(
    document: &Html,
    selectors: &[&str],
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let mut emails = Vec::new();

    for css in selectors {
        let selector = parse_selector(css)?;
        for element in document.select(&selector) {
            let text: String = element.text().collect();
            if may_hold_email(&text) {
                push_unique(&mut emails, filter.extract(&text));
            }
        }
    }

    Ok(emails)
}

/// Contact-signal elements: their text plus any `mailto:` target
pub fn from_contact_selectors(
    document: &Html,
    filter: &EmailFilter,
) -> Result<Vec<String>, ExtractError> {
    let mut emails = from_element_text(document, CONTACT_SELECTORS, filter)?;

    let mailto = parse_selector("a[href]")?;
    for anchor in document.select(&mailto) {
        if let Some(address) = anchor.value().attr("href").and_then(mailto_address) {
            push_unique(&mut emails, filter.extract(&address));
        }
    }

    Ok(emails)
}

/// The address part of a `mailto:` href, without query
pub fn mailto_address(href: &str) -> Option<String> {
    let rest = href.trim().strip_prefix("mailto:")?;
    let address = rest.split('?').next().unwrap_or_default().trim();
    let address = urlencoding::decode(address)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| address.to_string());

    (address.contains('@') && !address.contains(' ')).then_some(address)
}

/// Emails and social profiles found inside footer-like elements
#[derive(Debug, Clone, Default)]
pub struct FooterSignals {
    pub emails: Vec<String>,
    pub social: SocialHandles,
}

/// Scans the markup of footer-like elements for emails and social profiles
pub fn from_footer(document: &Html, filter: &EmailFilter) -> Result<FooterSignals, ExtractError> {
    let mut footer_html = String::new();
    let mut social = SocialHandles::default();

    for css in FOOTER_SELECTORS {
        let selector = parse_selector(css)?;
        for element in document.select(&selector) {
            footer_html.push_str(&element.inner_html());
            footer_html.push('\n');
            social.merge(social_within(element)?);
        }
    }

    Ok(FooterSignals {
        emails: filter.extract(&footer_html),
        social,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> EmailFilter {
        EmailFilter::default()
    }

    #[test]
    fn test_from_url_query_and_path() {
        let url = Url::parse("https://acme-widgets.io/u/jane%40acme-widgets.io?ref=ops@acme-widgets.io")
            .unwrap();
        let found = from_url(&url, &filter());
        assert_eq!(found, vec!["ops@acme-widgets.io", "jane@acme-widgets.io"]);
    }

    #[test]
    fn test_css_escapes() {
        let html = Html::parse_document(
            r#"<style>.e::after { content: "jane\0040acme-widgets\002eio"; }</style>"#,
        );
        assert_eq!(
            from_styles(&html, &filter()).unwrap(),
            vec!["jane@acme-widgets.io"]
        );
    }

    #[test]
    fn test_style_without_content_ignored() {
        let html = Html::parse_document(r#"<div style="background: url(a@b.png)"></div>"#);
        assert!(from_styles(&html, &filter()).unwrap().is_empty());
    }

    #[test]
    fn test_data_attributes() {
        let html = Html::parse_document(
            r#"<div data-contact-mail="amFuZUBhY21lLXdpZGdldHMuaW8="></div>
               <div data-owner="bob%40acme-widgets.io"></div>
               <div data-user="ops@acme-widgets.io"></div>"#,
        );
        let found = from_data_attributes(&html, &filter()).unwrap();
        assert!(found.contains(&"jane@acme-widgets.io".to_string()));
        assert!(found.contains(&"ops@acme-widgets.io".to_string()));
        // only mail-ish attribute names get decoded
        assert!(!found.contains(&"bob@acme-widgets.io".to_string()));
    }

    #[test]
    fn test_hidden_content() {
        let raw = r#"<body><!-- maintainer: dev@acme-widgets.io -->
            <div style="display:none">press@acme-widgets.io</div>
            <span hidden>legal@acme-widgets.io</span>
            <noscript>ops@acme-widgets.io</noscript></body>"#;
        let html = Html::parse_document(raw);
        let found = from_hidden_content(&html, raw, &filter()).unwrap();
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_meta_tags() {
        let html = Html::parse_document(
            r#"<head><meta property="og:email" content="press@acme-widgets.io">
               <meta name="description" content="Widgets for everyone."></head>"#,
        );
        assert_eq!(
            from_meta_tags(&html, &filter()).unwrap(),
            vec!["press@acme-widgets.io"]
        );
    }

    #[test]
    fn test_accessibility_attributes() {
        let html = Html::parse_document(
            r#"<img alt="Write to jane@acme-widgets.io" src="a.png">
               <a aria-label="ops@acme-widgets.io" href="/x">x</a>
               <span title="legal@acme-widgets.io">?</span>"#,
        );
        assert_eq!(from_accessibility(&html, &filter()).unwrap().len(), 3);
    }

    #[test]
    fn test_contact_forms() {
        let html = Html::parse_document(
            r#"<form action="/contact">
                 <input type="hidden" name="to" value="sales-team@acme-widgets.io">
                 <input type="email" placeholder="you@yourcompany.com">
               </form>
               <form action="/search"><input type="hidden" value="x@acme-widgets.io"></form>"#,
        );
        assert_eq!(
            from_contact_forms(&html, &filter()).unwrap(),
            vec!["sales-team@acme-widgets.io"]
        );
    }

    #[test]
    fn test_contact_selectors_and_mailto() {
        let html = Html::parse_document(
            r#"<div class="vcard">Jane Roe, jane@acme-widgets.io</div>
               <a href="mailto:bob@acme-widgets.io?subject=Hi">Email Bob</a>
               <a href="mailto:info@example.com">placeholder</a>"#,
        );
        let found = from_contact_selectors(&html, &filter()).unwrap();
        assert_eq!(found, vec!["jane@acme-widgets.io", "bob@acme-widgets.io"]);
    }

    #[test]
    fn test_mailto_address() {
        assert_eq!(
            mailto_address("mailto:jane%40acme-widgets.io?subject=x").as_deref(),
            Some("jane@acme-widgets.io")
        );
        assert_eq!(mailto_address("https://acme-widgets.io"), None);
        assert_eq!(mailto_address("mailto:"), None);
    }

    #[test]
    fn test_footer_signals() {
        let html = Html::parse_document(
            r#"<body><main><a href="https://twitter.com/main_acct">t</a></main>
               <footer>Reach us: team@acme-widgets.io
                 <a href="https://www.linkedin.com/company/acme-widgets">in</a>
               </footer></body>"#,
        );
        let footer = from_footer(&html, &filter()).unwrap();
        assert_eq!(footer.emails, vec!["team@acme-widgets.io"]);
        assert_eq!(footer.social.linkedin.len(), 1);
        assert!(footer.social.twitter.is_empty());
    }
}
