//! Social profile detection: Twitter/X handles, Facebook, Instagram and LinkedIn

use super::{body_or_root, isolate, parse_selector, visible_text, ExtractError};
use crate::model::SocialHandles;
use crate::url::matches_domain;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[A-Za-z0-9_]{1,15}$").expect("twitter handle regex"));

/// Fallback for hrefs that do not parse as URLs
static TWITTER_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[/.@])(?:twitter|x)\.com/([A-Za-z0-9_]+)")
        .expect("twitter path regex")
});

/// First path segments on twitter.com/x.com that are not user names
const RESERVED_TWITTER_PATHS: &[&str] = &[
    "share",
    "intent",
    "home",
    "hashtag",
    "compose",
    "search",
    "explore",
    "notifications",
    "messages",
    "settings",
    "i",
    "status",
    "statuses",
    "tweet",
    "retweet",
    "like",
    "reply",
    "follow",
    "unfollow",
    "block",
    "mute",
    "report",
    "lists",
    "moments",
    "topics",
    "bookmarks",
];

const TWITTER_HOSTS: &[&str] = &["twitter.com", "x.com", "t.co"];
const FACEBOOK_HOSTS: &[&str] = &["facebook.com", "fb.com"];
const INSTAGRAM_HOSTS: &[&str] = &["instagram.com"];
const LINKEDIN_HOSTS: &[&str] = &["linkedin.com"];
const INSTAGRAM_NON_PROFILE: &[&str] = &["p", "explore", "direct", "stories"];

/// Profile URLs shorter than this are bare domains or junk
const MIN_PROFILE_URL_LEN: usize = 26;

/// Finds social profiles anywhere in the document body
///
/// # Examples
///
/// ```
/// use contact_scout::extract_social_media;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     r#"<a href="https://twitter.com/share?text=hi">Share</a>
///        <a href="https://twitter.com/realhandle">Follow</a>"#,
/// );
/// let social = extract_social_media(&html);
/// assert_eq!(social.twitter.into_iter().collect::<Vec<_>>(), vec!["@realhandle"]);
/// ```
pub fn extract_social_media(document: &Html) -> SocialHandles {
    let root = body_or_root(document);
    isolate("social", || social_within(root)).into_value()
}

/// Finds social profiles inside one element subtree
pub fn social_within(root: ElementRef) -> Result<SocialHandles, ExtractError> {
    let mut social = SocialHandles::default();

    for token in visible_text(root).split_whitespace() {
        if HANDLE_RE.is_match(token) {
            social.twitter.insert(token.to_string());
        }
    }

    let anchors = parse_selector("a[href]")?;
    for anchor in root.select(&anchors) {
        if let Some(href) = anchor.value().attr("href") {
            classify_href(href, &mut social);
        }
    }

    let icons = parse_selector("i[class], svg[class]")?;
    for icon in root.select(&icons) {
        let classes = icon.value().attr("class").unwrap_or_default();
        if !is_twitter_icon(classes) || inside_link(icon) {
            continue;
        }

        let Some(parent) = icon.parent().and_then(ElementRef::wrap) else {
            continue;
        };

        for token in visible_text(parent).split_whitespace() {
            if HANDLE_RE.is_match(token) {
                social.twitter.insert(token.to_string());
            }
        }
    }

    Ok(social)
}

/// Sorts one href into the matching network, if any
fn classify_href(href: &str, social: &mut SocialHandles) {
    let href = href.trim();
    if href.is_empty() || href == "#" || href.starts_with("javascript:") {
        return;
    }

    let Some(absolute) = absolutize(href) else {
        return;
    };

    match Url::parse(&absolute) {
        Ok(url) => classify_url(&url, social),
        Err(_) => classify_unparsed(href, social),
    }
}

/// Turns protocol-relative and scheme-less hrefs into absolute ones
///
/// Site-relative paths (`/about`) cannot point at a social network and yield `None`.
fn absolutize(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with("//") {
        Some(format!("https:{}", href))
    } else if href.starts_with('/') || href.starts_with('.') || href.starts_with('?') {
        None
    } else if href.contains(':') && !href.contains("://") {
        // mailto:, tel:, sms: and friends
        None
    } else {
        Some(format!("https://{}", href))
    }
}

fn classify_url(url: &Url, social: &mut SocialHandles) {
    let Some(host) = url.host_str().map(|h| h.to_lowercase()) else {
        return;
    };
    let on = |hosts: &[&str]| hosts.iter().any(|h| matches_domain(h, &host));
    let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());
    let path = url.path();

    if on(TWITTER_HOSTS) {
        if let Some(handle) = segments.next().and_then(twitter_handle) {
            social.twitter.insert(handle);
        }
    } else if on(FACEBOOK_HOSTS) {
        if path.contains("/sharer") || path.contains("/dialog") {
            return;
        }
        let clean = format!("{}{}", url.origin().ascii_serialization(), path);
        if clean.len() >= MIN_PROFILE_URL_LEN
            && !clean.ends_with("facebook.com/")
            && !clean.ends_with("fb.com/")
        {
            social.facebook.insert(clean);
        }
    } else if on(INSTAGRAM_HOSTS) {
        let Some(first) = segments.next() else {
            return;
        };
        if INSTAGRAM_NON_PROFILE.contains(&first) {
            return;
        }
        let clean = format!("{}/{}", url.origin().ascii_serialization(), first);
        if clean.len() >= MIN_PROFILE_URL_LEN {
            social.instagram.insert(clean);
        }
    } else if on(LINKEDIN_HOSTS) {
        // also covers /shareArticle
        if path.contains("/share") {
            return;
        }
        let clean = format!("{}{}", url.origin().ascii_serialization(), path);
        if clean.len() >= MIN_PROFILE_URL_LEN && is_linkedin_profile(&clean) {
            social.linkedin.insert(clean);
        }
    }
}

/// Best-effort substring rules for hrefs the URL parser rejects
fn classify_unparsed(href: &str, social: &mut SocialHandles) {
    if let Some(caps) = TWITTER_PATH_RE.captures(href) {
        if let Some(handle) = caps.get(1).and_then(|m| twitter_handle(m.as_str())) {
            social.twitter.insert(handle);
        }
    }

    if href.len() < MIN_PROFILE_URL_LEN {
        return;
    }

    if (href.contains("facebook.com/") || href.contains("fb.com/"))
        && !href.contains("/sharer")
        && !href.contains("/dialog")
    {
        social.facebook.insert(href.to_string());
    }

    if href.contains("instagram.com/") && !href.contains("instagram.com/p/") {
        social.instagram.insert(href.to_string());
    }

    if href.contains("linkedin.com/") && !href.contains("/share") && is_linkedin_profile(href) {
        social.linkedin.insert(href.to_string());
    }
}

/// `@handle` from a first path segment, unless it is a reserved route
fn twitter_handle(segment: &str) -> Option<String> {
    let bare = segment.trim().trim_start_matches('@');
    if bare.is_empty() || RESERVED_TWITTER_PATHS.contains(&bare.to_lowercase().as_str()) {
        return None;
    }

    let handle = format!("@{}", bare);
    HANDLE_RE.is_match(&handle).then_some(handle)
}

fn is_linkedin_profile(url: &str) -> bool {
    url.contains("/in/") || url.contains("/company/") || url.contains("/school/")
}

/// Icon class names for Twitter/X (`fa-twitter`, `icon-tweet`, `fa-x-twitter`, `icon-x`)
fn is_twitter_icon(classes: &str) -> bool {
    classes.split_whitespace().any(|class| {
        let class = class.to_lowercase();
        class.contains("twitter")
            || class.contains("tweet")
            || class == "x"
            || class.starts_with("x-")
            || class.ends_with("-x")
            || class.contains("-x-")
    })
}

fn inside_link(element: ElementRef) -> bool {
    element.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .map_or(false, |el| el.attr("href").is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn social(html: &str) -> SocialHandles {
        extract_social_media(&Html::parse_document(html))
    }

    fn twitter(html: &str) -> Vec<String> {
        social(html).twitter.into_iter().collect()
    }

    #[test]
    fn test_share_link_rejected_profile_kept() {
        let html = r#"<body>
            <a href="https://twitter.com/share?text=hi">Share</a>
            <a href="https://twitter.com/realhandle">Follow us</a>
        </body>"#;
        assert_eq!(twitter(html), vec!["@realhandle"]);
    }

    #[test]
    fn test_x_and_protocol_relative_links() {
        let html = r#"<a href="https://x.com/acmewidgets">X</a>
                      <a href="//twitter.com/acme_hq?ref=site">T</a>
                      <a href="https://x.com/intent/tweet?text=x">Post</a>"#;
        assert_eq!(twitter(html), vec!["@acme_hq", "@acmewidgets"]);
    }

    #[test]
    fn test_host_check_not_substring() {
        // "box.com/" contains "x.com/" as a substring
        let html = r#"<a href="https://box.com/shared/file">Box</a>"#;
        assert!(twitter(html).is_empty());
    }

    #[test]
    fn test_unparsed_href_needs_host_boundary() {
        let mut social = SocialHandles::default();
        classify_unparsed("http://[bad]dropbox.com/foo", &mut social);
        classify_unparsed("http://[bad]/x.com/", &mut social);
        assert!(social.twitter.is_empty());

        classify_unparsed("http://[bad]/www.x.com/acme_hq", &mut social);
        classify_unparsed("twitter.com/acmewidgets", &mut social);
        assert_eq!(
            social.twitter.into_iter().collect::<Vec<_>>(),
            vec!["@acme_hq", "@acmewidgets"]
        );
    }

    #[test]
    fn test_overlong_handle_rejected() {
        let html = r#"<a href="https://twitter.com/thisnameiswaytoolong">T</a>"#;
        assert!(twitter(html).is_empty());
    }

    #[test]
    fn test_handles_in_text() {
        let html = r#"<body><p>Follow @acmewidgets for news</p>
            <p>mail jane@acme-widgets.io</p>
            <script>var x = "@notme";</script></body>"#;
        assert_eq!(twitter(html), vec!["@acmewidgets"]);
    }

    #[test]
    fn test_icon_without_link_uses_parent_text() {
        let html = r#"<div><i class="fa fa-twitter"></i> @acme_icons</div>
                      <a href="/x"><i class="fa fa-twitter"></i> @linked_icon</a>"#;
        let handles = twitter(html);
        assert!(handles.contains(&"@acme_icons".to_string()));
    }

    #[test]
    fn test_facebook_rules() {
        let s = social(
            r#"<a href="https://www.facebook.com/acmewidgets?ref=footer">FB</a>
               <a href="https://www.facebook.com/sharer/sharer.php?u=x">Share</a>
               <a href="https://www.facebook.com/">Home</a>"#,
        );
        assert_eq!(
            s.facebook.into_iter().collect::<Vec<_>>(),
            vec!["https://www.facebook.com/acmewidgets"]
        );
    }

    #[test]
    fn test_instagram_rules() {
        let s = social(
            r#"<a href="https://www.instagram.com/acmewidgets/?hl=en">IG</a>
               <a href="https://www.instagram.com/p/Cxyz123/">Post</a>"#,
        );
        assert_eq!(
            s.instagram.into_iter().collect::<Vec<_>>(),
            vec!["https://www.instagram.com/acmewidgets"]
        );
    }

    #[test]
    fn test_linkedin_rules() {
        let s = social(
            r#"<a href="https://www.linkedin.com/company/acme-widgets/">LI</a>
               <a href="https://www.linkedin.com/shareArticle?url=x">Share</a>
               <a href="https://www.linkedin.com/feed/">Feed</a>"#,
        );
        assert_eq!(
            s.linkedin.into_iter().collect::<Vec<_>>(),
            vec!["https://www.linkedin.com/company/acme-widgets/"]
        );
    }

    #[test]
    fn test_scoped_to_subtree() {
        let html = Html::parse_document(
            r#"<body><header><a href="https://twitter.com/header_acct">T</a></header>
               <footer><a href="https://twitter.com/footer_acct">T</a></footer></body>"#,
        );
        let footer = parse_selector("footer").unwrap();
        let el = html.select(&footer).next().unwrap();
        let s = social_within(el).unwrap();
        assert_eq!(s.twitter.into_iter().collect::<Vec<_>>(), vec!["@footer_acct"]);
    }

    #[test]
    fn test_relative_and_mailto_ignored() {
        let s = social(
            r#"<a href="/twitter.com/fake">x</a><a href="mailto:jane@acme-widgets.io">m</a>"#,
        );
        assert!(s.is_empty());
    }
}
