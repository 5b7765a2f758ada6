//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! full site crawls, the batch policies and the monitor end-to-end.

use async_trait::async_trait;
use contact_scout::config::Config;
use contact_scout::crawler::{
    extract_contact_info, process_batches, scrape_website, ContactScraper, SiteCrawler,
};
use contact_scout::model::{ContactRecord, EnrichedItem, EnrichmentOutcome, Item};
use contact_scout::monitor::{ListingFilter, ListingPage, ListingSource, Monitor};
use contact_scout::output::Notifier;
use contact_scout::storage::{SqliteStore, StateStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Config with short timeouts so failing tests fail fast
fn test_config() -> Config {
    let mut config = Config::default();
    config.timeouts.redirect_probe = 2_000;
    config.timeouts.wrapper_page = 2_000;
    config.timeouts.canonical = 2_000;
    config.timeouts.main_page = 2_000;
    config.timeouts.secondary_page = 2_000;
    config.timeouts.body_read = 2_000;
    config.timeouts.parse_phase = 5_000;
    config.batch.delay_ms = 0;
    config.monitor.page_delay_ms = 0;
    config.monitor.notify_stagger_ms = 0;
    config.monitor.min_interval_ms = 0;
    config
}

const MAIN_PAGE: &str = r#"<html><head><title>Acme Widgets</title></head><body>
    <nav><a href="/contact">Contact</a> <a href="/about">About</a></nav>
    <p>Questions? Write to jane@acme-widgets.io</p>
    <a href="https://twitter.com/acmewidgets">Twitter</a>
    <footer><a href="https://www.linkedin.com/company/acme-widgets">LinkedIn</a></footer>
    </body></html>"#;

const CONTACT_PAGE: &str = r#"<html><body>
    <form><input type="email" name="email" value="press@acme-widgets.io"></form>
    <address>Acme HQ, ops@acme-widgets.io</address>
    </body></html>"#;

const ABOUT_PAGE: &str = r#"<html><body>
    <div class="team-member">Dana, founder: dana@acme-widgets.io</div>
    </body></html>"#;

#[tokio::test]
async fn test_full_site_crawl_with_contact_and_about_pages() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/", MAIN_PAGE).await;
    mount_page(&server, "/contact", CONTACT_PAGE).await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let crawler = SiteCrawler::new(&test_config()).unwrap();
    let record = crawler.scrape(&base_url).await;

    for email in [
        "jane@acme-widgets.io",
        "press@acme-widgets.io",
        "ops@acme-widgets.io",
        "dana@acme-widgets.io",
    ] {
        assert!(record.emails.contains(email), "missing {}", email);
    }
    assert!(record.social.twitter.contains("@acmewidgets"));
    assert!(record
        .social
        .linkedin
        .contains("https://www.linkedin.com/company/acme-widgets"));
    assert_eq!(
        record.contact_page_url.as_deref(),
        Some(format!("{}/contact", base_url).as_str())
    );
    assert_eq!(
        record.about_page_url.as_deref(),
        Some(format!("{}/about", base_url).as_str())
    );
    assert_eq!(record.canonical_url, base_url);
    assert!(record
        .external_links
        .contains(&"https://twitter.com/acmewidgets".to_string()));
}

#[tokio::test]
async fn test_failed_secondary_page_keeps_its_url() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/", MAIN_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let crawler = SiteCrawler::new(&test_config()).unwrap();
    let record = crawler.scrape(&base_url).await;

    assert_eq!(
        record.contact_page_url.as_deref(),
        Some(format!("{}/contact", base_url).as_str())
    );
    assert!(!record.emails.contains("press@acme-widgets.io"));
    assert!(record.emails.contains("dana@acme-widgets.io"));
}

#[tokio::test]
async fn test_canonical_survives_main_page_timeout() {
    let server = MockServer::start().await;

    // The canonical lookup gets a fast answer, the main fetch a slow one
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><link rel="canonical" href="https://www.acme-widgets.io/"></head></html>"#,
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(MAIN_PAGE).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.timeouts.main_page = 300;
    let crawler = SiteCrawler::new(&config).unwrap();

    let record = crawler.scrape(&server.uri()).await;

    assert_eq!(record.canonical_url, "https://www.acme-widgets.io");
    assert!(record.emails.is_empty());
    assert!(record.contact_page_url.is_none());
}

/// Serves `body` with its headers at once and the rest of the body after `stall`
async fn spawn_stalling_body_server(body: &'static str, stall: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;

                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                let (first, rest) = body.split_at(20);
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(first.as_bytes()).await;
                let _ = socket.flush().await;

                tokio::time::sleep(stall).await;
                let _ = socket.write_all(rest.as_bytes()).await;
            });
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_main_page_body_read_budget() {
    let base_url = spawn_stalling_body_server(MAIN_PAGE, Duration::from_secs(3)).await;

    let mut config = test_config();
    config.timeouts.body_read = 300;
    let crawler = SiteCrawler::new(&config).unwrap();

    let started = Instant::now();
    let record = crawler.scrape(&base_url).await;

    // Headers arrived, so the post-redirect URL still counts as exact
    assert_eq!(record.canonical_url, base_url);
    assert!(record.emails.is_empty());
    assert!(record.social.is_empty());
    assert!(record.contact_page_url.is_none());
    assert!(record.about_page_url.is_none());
    assert!(started.elapsed() < Duration::from_secs(3));

    let enriched = EnrichedItem::enriched(Item::new("acme", "Acme", Some(base_url.clone())), &record);
    assert_eq!(enriched.contacts.exact_website_url.as_deref(), Some(base_url.as_str()));
    assert!(!enriched.has_contacts());
}

#[tokio::test]
async fn test_parse_deadline_keeps_finished_signals() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/", MAIN_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(CONTACT_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let mut config = test_config();
    config.timeouts.secondary_page = 5_000;
    config.timeouts.parse_phase = 800;
    let crawler = SiteCrawler::new(&config).unwrap();

    let started = Instant::now();
    let record = crawler.scrape(&base_url).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(record.emails.contains("jane@acme-widgets.io"));
    assert!(record.emails.contains("dana@acme-widgets.io"));
    assert!(!record.emails.contains("press@acme-widgets.io"));
    assert!(record.social.twitter.contains("@acmewidgets"));
    assert_eq!(
        record.contact_page_url.as_deref(),
        Some(format!("{}/contact", base_url).as_str())
    );
    assert_eq!(record.canonical_url, base_url);
}

#[tokio::test]
async fn test_non_success_main_page_returns_canonical_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("jane@acme-widgets.io"))
        .mount(&server)
        .await;

    let crawler = SiteCrawler::new(&test_config()).unwrap();
    let url = format!("{}/gone", server.uri());
    let record = crawler.scrape(&url).await;

    assert!(record.is_empty());
    assert_eq!(record.canonical_url, url);
}

#[tokio::test]
async fn test_redirect_wrapper_resolved_from_location_header() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/r/abc"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/landing"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/landing",
        "<html><body><p>Say hi: founders@acme-widgets.io</p></body></html>",
    )
    .await;

    let mut config = test_config();
    config.resolver.wrapper_patterns = vec!["/r/".to_string()];
    let crawler = SiteCrawler::new(&config).unwrap();

    let record = crawler.scrape(&format!("{}/r/abc", base_url)).await;

    assert_eq!(record.canonical_url, format!("{}/landing", base_url));
    assert!(record.emails.contains("founders@acme-widgets.io"));
}

#[tokio::test]
async fn test_redirect_wrapper_resolved_from_page_then_bypassed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/xyz"))
        .respond_with(html(
            r#"<html><body>
            <a href="/posts/acme">Discussion</a>
            <a rel="nofollow" href="https://github.com/acme-widgets">Acme</a>
            </body></html>"#,
        ))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.resolver.wrapper_patterns = vec!["/r/".to_string()];
    let crawler = SiteCrawler::new(&config).unwrap();

    let record = crawler.scrape(&format!("{}/r/xyz", server.uri())).await;

    // github.com is a bypass domain, so nothing is fetched from it
    assert!(record.is_empty());
    assert_eq!(record.canonical_url, "https://github.com/acme-widgets");
}

#[tokio::test]
async fn test_bypass_and_malformed_inputs() {
    let record = scrape_website("https://www.facebook.com/acmewidgets").await;
    assert!(record.is_empty());
    assert_eq!(record.canonical_url, "https://www.facebook.com/acmewidgets");

    let record = scrape_website("").await;
    assert_eq!(record, ContactRecord::empty(""));

    let record = scrape_website("not a url at all").await;
    assert!(record.is_empty());
    assert_eq!(record.canonical_url, "not a url at all");
}

#[tokio::test]
async fn test_process_batches_returns_one_result_per_item() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><body>team@acme-widgets.io</body></html>",
    )
    .await;

    let scraper: Arc<dyn ContactScraper> = Arc::new(SiteCrawler::new(&test_config()).unwrap());
    let items = vec![
        // Nothing listens on port 1
        Item::new("bad", "Broken", Some("http://127.0.0.1:1/".to_string())),
        Item::new("good", "Acme", Some(server.uri())),
    ];

    let results = process_batches(scraper, items, 2, Duration::ZERO).await;

    assert_eq!(results.len(), 2);
    let bad = results.iter().find(|r| r.id() == "bad").unwrap();
    assert!(!bad.has_contacts());
    let good = results.iter().find(|r| r.id() == "good").unwrap();
    assert_eq!(good.contacts.emails, vec!["team@acme-widgets.io"]);
}

/// Counts calls and never touches the network
#[derive(Default)]
struct CountingScraper {
    calls: AtomicUsize,
}

#[async_trait]
impl ContactScraper for CountingScraper {
    async fn scrape(&self, url: &str) -> ContactRecord {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ContactRecord::empty(url)
    }
}

#[tokio::test]
async fn test_extract_contact_info_stops_after_budget() {
    let scraper = Arc::new(CountingScraper::default());
    let items = (1..=5)
        .map(|i| Item::new(i.to_string(), "Site", Some(format!("site{}.dev", i))))
        .collect();

    let results = extract_contact_info(scraper.clone(), items, 1).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), "1");
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
}

struct StaticSource {
    items: Vec<Item>,
}

#[async_trait]
impl ListingSource for StaticSource {
    async fn fetch_listing_page(
        &self,
        _filter: &ListingFilter,
        _cursor: Option<&str>,
    ) -> contact_scout::Result<ListingPage> {
        Ok(ListingPage {
            items: self.items.clone(),
            next_cursor: None,
            has_more: false,
        })
    }
}

#[derive(Default)]
struct CountingNotifier {
    sent: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, item: &EnrichedItem) -> bool {
        self.sent.fetch_add(1, Ordering::SeqCst);
        item.outcome == EnrichmentOutcome::Enriched
    }
}

#[tokio::test]
async fn test_monitor_enriches_notifies_and_persists() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_page(&server, "/a", "<html><body>bob@acme-widgets.io</body></html>").await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("scout.db");

    let config = test_config();
    let source = Arc::new(StaticSource {
        items: vec![
            Item::new("a", "Acme", Some(format!("{}/a", base_url))),
            Item::new("b", "No Site", None),
        ],
    });
    let notifier = Arc::new(CountingNotifier::default());
    let scraper = Arc::new(SiteCrawler::new(&config).unwrap());

    let mut monitor = Monitor::new(&config, source, scraper)
        .with_notifier(notifier.clone())
        .with_store(Box::new(SqliteStore::new(&db_path).unwrap()));

    let report = monitor.check_for_new_items().await.unwrap();

    assert_eq!(report.new_items.len(), 2);
    assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(report.stats.items_enriched, 1);
    assert_eq!(report.stats.items_skipped, 1);

    let acme = &report.new_items[0];
    assert_eq!(acme.contacts.emails, vec!["bob@acme-widgets.io"]);
    assert_eq!(acme.item.website.as_deref(), Some(format!("{}/a", base_url).as_str()));

    // A second run sees nothing new
    let report = monitor.check_for_new_items().await.unwrap();
    assert!(report.new_items.is_empty());

    drop(monitor);
    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.load_seen_ids().unwrap(), vec!["a", "b"]);
    assert_eq!(store.count_enriched_items().unwrap(), 2);
    assert_eq!(store.get_latest_run().unwrap().unwrap().stats.items_found, 0);
}
