use super::record::ContactRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A listing item to enrich
///
/// Fields other than `id`, `name` and `website` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, website: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            website,
            extra: Map::new(),
        }
    }

    /// The website, if present and non-blank
    pub fn website(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// How an item left the enrichment step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentOutcome {
    /// The website was crawled (possibly finding nothing)
    Enriched,
    /// No website to crawl
    MissingWebsite,
    /// The crawl task failed; contacts are empty
    Failed,
}

impl EnrichmentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentOutcome::Enriched => "enriched",
            EnrichmentOutcome::MissingWebsite => "missing-website",
            EnrichmentOutcome::Failed => "failed",
        }
    }
}

/// Contact fields as attached to an enriched item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub emails: Vec<String>,
    pub twitter_handles: Vec<String>,
    pub facebook_links: Vec<String>,
    pub instagram_links: Vec<String>,
    pub linkedin_links: Vec<String>,
    pub contact_links: Vec<String>,
    pub about_links: Vec<String>,
    pub external_links: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_website_url: Option<String>,
}

impl From<&ContactRecord> for ContactFields {
    fn from(record: &ContactRecord) -> Self {
        Self {
            emails: record.emails.iter().cloned().collect(),
            twitter_handles: record.social.twitter.iter().cloned().collect(),
            facebook_links: record.social.facebook.iter().cloned().collect(),
            instagram_links: record.social.instagram.iter().cloned().collect(),
            linkedin_links: record.social.linkedin.iter().cloned().collect(),
            contact_links: record.contact_page_url.iter().cloned().collect(),
            about_links: record.about_page_url.iter().cloned().collect(),
            external_links: record.external_links.clone(),
            exact_website_url: Some(record.canonical_url.clone())
                .filter(|url| !url.is_empty()),
        }
    }
}

/// An item with its contact fields flattened onto it
///
/// Only serialized; storage keeps the item and its contacts separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: Item,

    #[serde(flatten)]
    pub contacts: ContactFields,

    pub outcome: EnrichmentOutcome,
}

impl EnrichedItem {
    pub fn enriched(item: Item, record: &ContactRecord) -> Self {
        Self {
            item,
            contacts: ContactFields::from(record),
            outcome: EnrichmentOutcome::Enriched,
        }
    }

    /// Fallback with every contact field empty
    pub fn fallback(item: Item, outcome: EnrichmentOutcome) -> Self {
        Self {
            item,
            contacts: ContactFields::default(),
            outcome,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn has_contacts(&self) -> bool {
        let c = &self.contacts;
        !(c.emails.is_empty()
            && c.twitter_handles.is_empty()
            && c.facebook_links.is_empty()
            && c.instagram_links.is_empty()
            && c.linkedin_links.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_keeps_extra_fields() {
        let item: Item = serde_json::from_value(json!({
            "id": "42",
            "name": "Acme",
            "website": "https://acme.io",
            "votesCount": 17,
            "tagline": "Widgets"
        }))
        .unwrap();

        assert_eq!(item.website(), Some("https://acme.io"));
        assert_eq!(item.extra.get("votesCount"), Some(&json!(17)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["tagline"], "Widgets");
    }

    #[test]
    fn test_blank_website_is_missing() {
        let item = Item::new("1", "Blank", Some("   ".to_string()));
        assert_eq!(item.website(), None);
    }

    #[test]
    fn test_enriched_item_serializes_flat() {
        let mut record = ContactRecord::empty("https://acme.io");
        record.add_emails(["hello@acme.io"]);
        record.social.twitter.insert("@acme".to_string());
        record.contact_page_url = Some("https://acme.io/contact".to_string());

        let item = Item::new("7", "Acme", Some("https://acme.io".to_string()));
        let enriched = EnrichedItem::enriched(item, &record);
        let value = serde_json::to_value(&enriched).unwrap();

        assert_eq!(value["id"], "7");
        assert_eq!(value["emails"], json!(["hello@acme.io"]));
        assert_eq!(value["twitterHandles"], json!(["@acme"]));
        assert_eq!(value["contactLinks"], json!(["https://acme.io/contact"]));
        assert_eq!(value["exactWebsiteUrl"], "https://acme.io");
        assert_eq!(value["outcome"], "enriched");
        assert!(enriched.has_contacts());
    }

    #[test]
    fn test_fallback_has_empty_contacts() {
        let item = Item::new("8", "Nothing", None);
        let fallback = EnrichedItem::fallback(item, EnrichmentOutcome::MissingWebsite);
        let value = serde_json::to_value(&fallback).unwrap();

        assert_eq!(value["emails"], json!([]));
        assert_eq!(value["outcome"], "missing-website");
        assert!(value.get("exactWebsiteUrl").is_none());
        assert!(!fallback.has_contacts());
    }
}
