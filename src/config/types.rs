use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Contact-Scout
///
/// Every section has defaults, so an empty TOML file (or `Config::default()`)
/// yields a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub timeouts: TimeoutConfig,
    pub batch: BatchConfig,
    pub filters: FilterConfig,
    pub resolver: ResolverConfig,
    pub monitor: MonitorConfig,
    pub output: OutputConfig,
    pub notifier: NotifierConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pool of User-Agent strings, one picked at random per request
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,

    /// Maximum number of external links kept per crawled site
    #[serde(rename = "max-external-links")]
    pub max_external_links: usize,

    /// Maximum redirect hops followed by the redirect-following client
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Recursion cap for the JSON-LD email visitor
    #[serde(rename = "json-depth-limit")]
    pub json_depth_limit: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:90.0) Gecko/20100101 Firefox/90.0".to_string(),
            ],
            max_external_links: 10,
            max_redirects: 10,
            json_depth_limit: 32,
        }
    }
}

/// Per-call-site timeout budgets, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Manual (non-following) probe of a redirect wrapper
    #[serde(rename = "redirect-probe")]
    pub redirect_probe: u64,

    /// Fetch of the wrapper page itself
    #[serde(rename = "wrapper-page")]
    pub wrapper_page: u64,

    /// Redirect-following fetch used to find the canonical URL
    pub canonical: u64,

    /// Main page fetch
    #[serde(rename = "main-page")]
    pub main_page: u64,

    /// Contact/about page fetch
    #[serde(rename = "secondary-page")]
    pub secondary_page: u64,

    /// Reading the main page body
    #[serde(rename = "body-read")]
    pub body_read: u64,

    /// Whole parse-and-extract phase, including secondary pages
    #[serde(rename = "parse-phase")]
    pub parse_phase: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            redirect_probe: 5_000,
            wrapper_page: 8_000,
            canonical: 8_000,
            main_page: 15_000,
            secondary_page: 5_000,
            body_read: 10_000,
            parse_phase: 15_000,
        }
    }
}

impl TimeoutConfig {
    pub fn redirect_probe(&self) -> Duration {
        Duration::from_millis(self.redirect_probe)
    }

    pub fn wrapper_page(&self) -> Duration {
        Duration::from_millis(self.wrapper_page)
    }

    pub fn canonical(&self) -> Duration {
        Duration::from_millis(self.canonical)
    }

    pub fn main_page(&self) -> Duration {
        Duration::from_millis(self.main_page)
    }

    pub fn secondary_page(&self) -> Duration {
        Duration::from_millis(self.secondary_page)
    }

    pub fn body_read(&self) -> Duration {
        Duration::from_millis(self.body_read)
    }

    pub fn parse_phase(&self) -> Duration {
        Duration::from_millis(self.parse_phase)
    }
}

/// Batch scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of crawls launched together in one chunk
    #[serde(rename = "concurrency-limit")]
    pub concurrency_limit: usize,

    /// Delay inserted between chunks (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Maximum number of items crawled by the sequential policy
    #[serde(rename = "max-count")]
    pub max_count: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 5,
            delay_ms: 1_000,
            max_count: 10,
        }
    }
}

/// Heuristic tables used by the extractors and the bypass check
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Hosts (and their subdomains) that are never crawled
    #[serde(rename = "bypass-domains")]
    pub bypass_domains: Vec<String>,

    /// Email domains rejected on substring match
    #[serde(rename = "placeholder-domains")]
    pub placeholder_domains: Vec<String>,

    /// Email local parts rejected on exact match
    #[serde(rename = "placeholder-usernames")]
    pub placeholder_usernames: Vec<String>,

    /// TLD suffixes accepted with lenient validation
    #[serde(rename = "likely-real-tlds")]
    pub likely_real_tlds: Vec<String>,

    /// Domain suffixes that mark an asset file name rather than an address
    #[serde(rename = "asset-suffixes")]
    pub asset_suffixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bypass_domains: to_strings(crate::url::DEFAULT_BYPASS_DOMAINS),
            placeholder_domains: to_strings(crate::extract::DEFAULT_PLACEHOLDER_DOMAINS),
            placeholder_usernames: to_strings(crate::extract::DEFAULT_PLACEHOLDER_USERNAMES),
            likely_real_tlds: to_strings(crate::extract::DEFAULT_LIKELY_REAL_TLDS),
            asset_suffixes: to_strings(crate::extract::DEFAULT_ASSET_SUFFIXES),
        }
    }
}

/// Listing-platform redirect wrapper configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Host of the listing platform; links pointing back to it are ignored
    #[serde(rename = "platform-host")]
    pub platform_host: String,

    /// Substrings identifying a redirect wrapper URL
    #[serde(rename = "wrapper-patterns")]
    pub wrapper_patterns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            platform_host: "producthunt.com".to_string(),
            wrapper_patterns: vec!["producthunt.com/r/".to_string(), "ph.co/".to_string()],
        }
    }
}

/// New-item monitor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Listing lookback window in days
    #[serde(rename = "lookback-days")]
    pub lookback_days: u32,

    /// Items requested per listing page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Maximum listing pages fetched per run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Delay between listing pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Attempts for a failing listing page before the run stops paginating
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Linear backoff unit between listing retries (milliseconds)
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,

    /// Delay between consecutive notifications (milliseconds)
    #[serde(rename = "notify-stagger-ms")]
    pub notify_stagger_ms: u64,

    /// Minimum time between two monitor runs (milliseconds)
    #[serde(rename = "min-interval-ms")]
    pub min_interval_ms: u64,

    /// Seen-ID set size that triggers eviction
    #[serde(rename = "seen-capacity")]
    pub seen_capacity: usize,

    /// Seen-ID set size kept after eviction
    #[serde(rename = "seen-retain")]
    pub seen_retain: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            lookback_days: 1,
            page_size: 50,
            max_pages: 10,
            page_delay_ms: 1_000,
            max_retries: 3,
            retry_backoff_ms: 5_000,
            notify_stagger_ms: 200,
            min_interval_ms: 30_000,
            seen_capacity: 1_000,
            seen_retain: 500,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./contact-scout.db".to_string(),
        }
    }
}

/// Notification sink configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Webhook receiving one POST per enriched item
    #[serde(rename = "webhook-url")]
    pub webhook_url: Option<String>,

    /// Timeout for a single webhook delivery (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: 10_000,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
