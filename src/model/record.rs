use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Social profiles discovered on a site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandles {
    /// Twitter/X handles in `@handle` form
    pub twitter: BTreeSet<String>,
    pub facebook: BTreeSet<String>,
    pub instagram: BTreeSet<String>,
    pub linkedin: BTreeSet<String>,
}

impl SocialHandles {
    /// Adds every handle of `other` to `self`
    pub fn merge(&mut self, other: SocialHandles) {
        self.twitter.extend(other.twitter);
        self.facebook.extend(other.facebook);
        self.instagram.extend(other.instagram);
        self.linkedin.extend(other.linkedin);
    }

    pub fn is_empty(&self) -> bool {
        self.twitter.is_empty()
            && self.facebook.is_empty()
            && self.instagram.is_empty()
            && self.linkedin.is_empty()
    }

    /// Total number of links and handles across all networks
    pub fn len(&self) -> usize {
        self.twitter.len() + self.facebook.len() + self.instagram.len() + self.linkedin.len()
    }
}

/// Contact signals extracted from one website
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Lower-cased email addresses
    pub emails: BTreeSet<String>,
    pub social: SocialHandles,
    pub contact_page_url: Option<String>,
    pub about_page_url: Option<String>,
    /// Best known URL of the site; falls back to the input on any failure
    pub canonical_url: String,
    pub external_links: Vec<String>,
}

impl ContactRecord {
    /// A record with no signals and the given canonical URL
    pub fn empty(canonical_url: impl Into<String>) -> Self {
        Self {
            canonical_url: canonical_url.into(),
            ..Self::default()
        }
    }

    /// Adds emails, lower-casing them
    pub fn add_emails<I, S>(&mut self, emails: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for email in emails {
            self.emails.insert(email.as_ref().to_lowercase());
        }
    }

    /// True when nothing beyond the canonical URL was found
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.social.is_empty()
            && self.contact_page_url.is_none()
            && self.about_page_url.is_none()
            && self.external_links.is_empty()
    }
}
