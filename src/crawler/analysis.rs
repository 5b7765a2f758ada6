//! Synchronous page analysis
//!
//! Everything in this module takes raw HTML and returns plain owned data.
//! The parsed [`Html`] document never leaves the function that built it,
//! which lets the crawler run analysis on a blocking thread and keep its
//! own futures `Send`.

use crate::config::Config;
use crate::extract::{
    self, emails_from_json_ld, emails_from_obfuscation, isolate, links, push_unique, surfaces,
    EmailFilter,
};
use crate::model::SocialHandles;
use crate::url::UrlPolicy;
use scraper::Html;
use url::Url;

/// Elements on a contact page whose text is scanned
const CONTACT_PAGE_TEXT: &[&str] = &["p", "div", "span", "address"];

/// Team-member blocks on an about page
const TEAM_SELECTORS: &[&str] = &[
    ".team",
    ".team-member",
    ".member",
    ".employee",
    "[class*=\"team\"]",
    "[class*=\"member\"]",
];

/// Signals gathered from the main page
#[derive(Debug, Clone, Default)]
pub struct MainPageAnalysis {
    pub emails: Vec<String>,
    pub social: SocialHandles,
    pub footer: surfaces::FooterSignals,
    pub contact_url: Option<String>,
    pub about_url: Option<String>,
    pub external_links: Vec<String>,
}

/// Signals gathered from a contact or about page
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    pub emails: Vec<String>,
    pub social: SocialHandles,
}

/// Runs every extractor that applies to a page
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    filter: EmailFilter,
    policy: UrlPolicy,
    max_external_links: usize,
    json_depth_limit: usize,
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PageAnalyzer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            filter: EmailFilter::from_config(&config.filters),
            policy: UrlPolicy::from_config(config),
            max_external_links: config.crawler.max_external_links,
            json_depth_limit: config.crawler.json_depth_limit,
        }
    }

    pub fn filter(&self) -> &EmailFilter {
        &self.filter
    }

    pub fn policy(&self) -> &UrlPolicy {
        &self.policy
    }

    /// Analyzes the site's main page
    ///
    /// Emails come from the raw markup and from every email surface. Link
    /// discovery is skipped when `page_url` does not parse.
    pub fn main_page(&self, raw_html: &str, page_url: &str) -> MainPageAnalysis {
        let document = Html::parse_document(raw_html);
        let filter = &self.filter;
        let mut emails = filter.extract(raw_html);

        let base = Url::parse(page_url).ok();
        if let Some(base) = &base {
            push_unique(&mut emails, surfaces::from_url(base, filter));
        }

        let surface_results = [
            isolate("styles", || surfaces::from_styles(&document, filter)),
            isolate("data-attributes", || surfaces::from_data_attributes(&document, filter)),
            isolate("hidden-content", || {
                surfaces::from_hidden_content(&document, raw_html, filter)
            }),
            isolate("meta-tags", || surfaces::from_meta_tags(&document, filter)),
            isolate("json-ld", || {
                emails_from_json_ld(&document, filter, self.json_depth_limit)
            }),
            isolate("obfuscation", || {
                emails_from_obfuscation(&document, raw_html, filter)
            }),
            isolate("accessibility", || surfaces::from_accessibility(&document, filter)),
            isolate("contact-forms", || surfaces::from_contact_forms(&document, filter)),
            isolate("contact-selectors", || {
                surfaces::from_contact_selectors(&document, filter)
            }),
        ];
        for result in surface_results {
            push_unique(&mut emails, result.into_value());
        }

        let social = extract::extract_social_media(&document);
        let footer = isolate("footer", || surfaces::from_footer(&document, filter)).into_value();

        let (contact_url, about_url, external_links) = match &base {
            Some(base) => (
                isolate("contact-link", || {
                    links::find_contact_link(&document, base, &self.policy)
                })
                .into_value(),
                isolate("about-link", || links::find_about_link(&document, base, &self.policy))
                    .into_value(),
                isolate("external-links", || {
                    links::external_links(&document, base, self.max_external_links)
                })
                .into_value(),
            ),
            None => (None, None, Vec::new()),
        };

        MainPageAnalysis {
            emails,
            social,
            footer,
            contact_url,
            about_url,
            external_links,
        }
    }

    /// Analyzes a contact page: raw markup, form inputs and block text
    pub fn contact_page(&self, raw_html: &str) -> PageSignals {
        let document = Html::parse_document(raw_html);
        let filter = &self.filter;
        let mut emails = filter.extract(raw_html);

        push_unique(
            &mut emails,
            isolate("email-inputs", || surfaces::from_email_inputs(&document, filter)).into_value(),
        );
        push_unique(
            &mut emails,
            isolate("contact-page-text", || {
                surfaces::from_element_text(&document, CONTACT_PAGE_TEXT, filter)
            })
            .into_value(),
        );

        PageSignals {
            emails,
            social: extract::extract_social_media(&document),
        }
    }

    /// Analyzes an about page: raw markup and team-member blocks
    pub fn about_page(&self, raw_html: &str) -> PageSignals {
        let document = Html::parse_document(raw_html);
        let filter = &self.filter;
        let mut emails = filter.extract(raw_html);

        push_unique(
            &mut emails,
            isolate("team-members", || {
                surfaces::from_element_text(&document, TEAM_SELECTORS, filter)
            })
            .into_value(),
        );

        PageSignals {
            emails,
            social: extract::extract_social_media(&document),
        }
    }
}
