//! Markdown rendering
//!
//! This module renders enriched items for webhook notifications and renders
//! whole runs for the command line.

use crate::model::EnrichedItem;
use crate::output::stats::RunStats;
use std::fmt::Write;

/// Formats one enriched item as a markdown notification
///
/// Only the fields that hold something are listed.
pub fn format_item_markdown(item: &EnrichedItem) -> String {
    let mut md = String::new();
    let contacts = &item.contacts;

    let name = if item.item.name.trim().is_empty() {
        item.id()
    } else {
        item.item.name.trim()
    };
    let _ = writeln!(md, "**{}**", name);

    let website = contacts
        .exact_website_url
        .as_deref()
        .or_else(|| item.item.website());
    if let Some(website) = website {
        let _ = writeln!(md, "- **Website**: {}", website);
    }

    push_list(&mut md, "Emails", &contacts.emails);
    push_list(&mut md, "Twitter", &contacts.twitter_handles);
    push_list(&mut md, "LinkedIn", &contacts.linkedin_links);
    push_list(&mut md, "Facebook", &contacts.facebook_links);
    push_list(&mut md, "Instagram", &contacts.instagram_links);
    push_list(&mut md, "Contact page", &contacts.contact_links);
    push_list(&mut md, "About page", &contacts.about_links);

    if !item.has_contacts() {
        md.push_str("_No contact details found_\n");
    }

    md
}

fn push_list(md: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        let _ = writeln!(md, "- **{}**: {}", label, values.join(", "));
    }
}

/// Formats a whole run: a statistics header followed by every item
///
/// # Arguments
///
/// * `items` - The enriched items, in output order
/// * `stats` - Tally of the run
///
/// # Returns
///
/// A formatted markdown string
pub fn format_run_markdown(items: &[EnrichedItem], stats: &RunStats) -> String {
    let mut md = String::new();

    md.push_str("# Contact-Scout Results\n\n");
    md.push_str("## Statistics\n\n");
    let _ = writeln!(md, "- **Items**: {}", stats.items_found);
    let _ = writeln!(md, "- **Crawled**: {}", stats.items_enriched);
    let _ = writeln!(md, "- **With Contacts**: {}", stats.items_with_contacts);
    let _ = writeln!(md, "- **Skipped**: {}", stats.items_skipped);
    let _ = writeln!(md, "- **Failed**: {}", stats.items_failed);
    let _ = writeln!(md, "- **Emails**: {}", stats.emails_found);
    let _ = writeln!(md, "- **Success Rate**: {:.2}%\n", stats.success_rate());

    md.push_str("## Items\n\n");
    if items.is_empty() {
        md.push_str("_No items processed_\n");
    }
    for item in items {
        md.push_str(&format_item_markdown(item));
        md.push('\n');
    }

    md
}
