//! Email address detection and placeholder filtering

use crate::config::FilterConfig;
use once_cell::sync::Lazy;
use regex::Regex;

/// RFC 5322-style address pattern, case-insensitive
static STRICT_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#,
    )
    .expect("strict email regex")
});

static SIMPLE_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("simple email regex")
});

/// Whole-string check used for domains outside the likely-real TLD list
static COMMON_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("common email regex")
});

static SUSPICIOUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[<>{}()\[\]\\/]").expect("suspicious chars regex"));

static DEFAULT_FILTER: Lazy<EmailFilter> = Lazy::new(EmailFilter::default);

/// Domains used in templates and documentation, rejected on substring match
pub const DEFAULT_PLACEHOLDER_DOMAINS: &[&str] = &[
    "example.com",
    "domain.com",
    "yourdomain.com",
    "email.com",
    "yourcompany.com",
    "acme.com",
    "test.com",
    "sample.com",
    "website.com",
    "mail.com",
    "gmail.example",
    "example.org",
    "example.net",
    "localhost",
    "test.local",
    "demo.com",
    "placeholder.com",
    "yoursite.com",
    "site.com",
    "user.com",
    "username.com",
    "mydomain.com",
    "mysite.com",
    "mycompany.com",
    "myemail.com",
    "emailaddress.com",
    "mailaddress.com",
    "mailbox.com",
    "mailme.com",
    "emailme.com",
    "contactme.com",
    "contactus.com",
    "info.example",
    "support.example",
    "contact.example",
    "hello.example",
    "admin.example",
    "webmaster.example",
    "postmaster.example",
    "hostmaster.example",
    "sales.example",
    "marketing.example",
    "billing.example",
    "help.example",
    "service.example",
    "feedback.example",
    "enquiry.example",
    "inquiry.example",
    "noreply.example",
    "no-reply.example",
    "donotreply.example",
    "do-not-reply.example",
];

/// Generic mailbox names rejected on exact match of the local part
pub const DEFAULT_PLACEHOLDER_USERNAMES: &[&str] = &[
    "user",
    "username",
    "email",
    "your",
    "john.doe",
    "jane.doe",
    "admin",
    "test",
    "example",
    "hello",
    "noreply",
    "no-reply",
    "donotreply",
    "do-not-reply",
    "webmaster",
    "postmaster",
    "hostmaster",
    "marketing",
    "billing",
    "help",
    "service",
    "feedback",
    "enquiry",
    "inquiry",
    "info",
    "support",
    "contact",
];

pub const DEFAULT_LIKELY_REAL_TLDS: &[&str] = &[
    ".com", ".org", ".net", ".io", ".co", ".us", ".uk", ".ca", ".au", ".de", ".fr", ".es", ".it",
    ".nl", ".ru", ".jp", ".cn", ".in", ".br", ".mx", ".se", ".no", ".dk", ".fi", ".pl", ".ch",
    ".at", ".be", ".ie", ".nz",
];

/// File extensions that show up as the "domain" of retina asset names (`logo@2x.png`)
pub const DEFAULT_ASSET_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".avif", ".ico", ".bmp", ".css", ".js",
];

/// Candidate matching plus placeholder filtering
#[derive(Debug, Clone)]
pub struct EmailFilter {
    placeholder_domains: Vec<String>,
    placeholder_usernames: Vec<String>,
    likely_real_tlds: Vec<String>,
    asset_suffixes: Vec<String>,
}

impl Default for EmailFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl EmailFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        let lower = |values: &[String]| values.iter().map(|v| v.to_lowercase()).collect();

        Self {
            placeholder_domains: lower(&config.placeholder_domains),
            placeholder_usernames: lower(&config.placeholder_usernames),
            likely_real_tlds: lower(&config.likely_real_tlds),
            asset_suffixes: lower(&config.asset_suffixes),
        }
    }

    /// Finds every accepted address in `text`
    ///
    /// Matches of the strict and the simple pattern are unioned, deduplicated
    /// in first-seen order (case-sensitive), then filtered.
    pub fn extract(&self, text: &str) -> Vec<String> {
        if !text.contains('@') {
            return Vec::new();
        }

        let mut candidates: Vec<&str> = Vec::new();
        for m in STRICT_EMAIL_RE
            .find_iter(text)
            .chain(SIMPLE_EMAIL_RE.find_iter(text))
        {
            if !candidates.contains(&m.as_str()) {
                candidates.push(m.as_str());
            }
        }

        candidates
            .into_iter()
            .filter(|candidate| self.accepts(candidate))
            .map(str::to_string)
            .collect()
    }

    /// Applies the placeholder and plausibility rules to one address
    pub fn accepts(&self, email: &str) -> bool {
        let lower = email.to_lowercase();
        let Some((user, domain)) = lower.split_once('@') else {
            return false;
        };

        if domain.len() < 4 || !domain.contains('.') {
            return false;
        }

        if self
            .placeholder_domains
            .iter()
            .any(|placeholder| domain.contains(placeholder.as_str()))
        {
            return false;
        }

        if self.placeholder_usernames.iter().any(|name| name == user) {
            return false;
        }

        if self
            .asset_suffixes
            .iter()
            .any(|suffix| domain.ends_with(suffix.as_str()))
        {
            return false;
        }

        let suspicious = SUSPICIOUS_RE.is_match(email);
        let likely_real = self
            .likely_real_tlds
            .iter()
            .any(|tld| domain.ends_with(tld.as_str()));

        if likely_real {
            !suspicious
        } else {
            COMMON_EMAIL_RE.is_match(email) && !suspicious
        }
    }
}

/// Extracts addresses from free text using the default filter lists
///
/// # Examples
///
/// ```
/// use contact_scout::extract_emails;
///
/// let found = extract_emails("Contact us at hello@example.com or sales@realcompany.io");
/// assert_eq!(found, vec!["sales@realcompany.io"]);
/// ```
pub fn extract_emails(text: &str) -> Vec<String> {
    DEFAULT_FILTER.extract(text)
}
