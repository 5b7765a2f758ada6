//! Webhook notifier
//!
//! Posts each enriched item to a chat webhook as `{"content": markdown}`.

use crate::config::NotifierConfig;
use crate::model::EnrichedItem;
use crate::output::markdown::format_item_markdown;
use crate::output::traits::{Notifier, OutputError, OutputResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Longest message body most chat webhooks accept
const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Notifier that POSTs markdown to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier for `url` with a per-request timeout
    pub fn new(url: &str, timeout: Duration) -> OutputResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| OutputError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(OutputError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Builds a notifier from config, or None when no webhook is configured
    pub fn from_config(config: &NotifierConfig) -> OutputResult<Option<Self>> {
        match config.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Self::new(url, Duration::from_millis(config.timeout_ms)).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Posts one message, failing on transport errors and non-2xx replies
    pub async fn send(&self, content: &str) -> OutputResult<()> {
        let content = truncate_chars(content, MAX_CONTENT_CHARS);
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OutputError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, item: &EnrichedItem) -> bool {
        let content = format_item_markdown(item);
        match self.send(&content).await {
            Ok(()) => {
                tracing::debug!("Sent notification for item {}", item.id());
                true
            }
            Err(e) => {
                tracing::warn!("Notification for item {} failed: {}", item.id(), e);
                false
            }
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}
