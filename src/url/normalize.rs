use url::Url;

/// Path/query substrings that mark a URL whose query string is significant
const QUERY_KEEP_MARKERS: &[&str] = &["product", "item", "page"];

/// Checks that a string is a parseable http(s) URL
///
/// # Examples
///
/// ```
/// use contact_scout::url::is_valid_url;
///
/// assert!(is_valid_url("https://acme.io"));
/// assert!(!is_valid_url("ftp://acme.io"));
/// assert!(!is_valid_url("   "));
/// ```
pub fn is_valid_url(url_str: &str) -> bool {
    if url_str.trim().is_empty() {
        return false;
    }

    match Url::parse(url_str) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Prepends `https://` to a string that carries no http(s) scheme
pub fn ensure_scheme(url_str: &str) -> String {
    let trimmed = url_str.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Normalizes a URL to `origin + path`
///
/// # Normalization Steps
///
/// 1. Prepend `https://` when no http(s) scheme is present
/// 2. Parse the URL; on failure return the input unchanged
/// 3. Rebuild as origin plus path, dropping trailing slashes and the fragment
/// 4. Keep the query only when the URL mentions `product`, `item` or `page`
///
/// Strings with a different explicit scheme (`ftp://`, `mailto:`) are
/// returned untouched. The function is idempotent.
///
/// # Examples
///
/// ```
/// use contact_scout::url::normalize_url;
///
/// assert_eq!(normalize_url("acme.io/"), "https://acme.io");
/// assert_eq!(normalize_url("https://acme.io/blog/?utm=x"), "https://acme.io/blog");
/// assert_eq!(
///     normalize_url("https://shop.io/product?id=3"),
///     "https://shop.io/product?id=3"
/// );
/// ```
pub fn normalize_url(url_str: &str) -> String {
    if url_str.is_empty() {
        return String::new();
    }

    if has_foreign_scheme(url_str) {
        return url_str.to_string();
    }

    let with_scheme = ensure_scheme(url_str);
    let url = match Url::parse(&with_scheme) {
        Ok(url) => url,
        Err(_) => return url_str.to_string(),
    };

    let origin = url.origin();
    if !origin.is_tuple() {
        return url_str.to_string();
    }

    let mut normalized = origin.ascii_serialization();
    normalized.push_str(url.path().trim_end_matches('/'));

    if let Some(query) = url.query() {
        if !query.is_empty() && keeps_query(&url) {
            normalized.push('?');
            normalized.push_str(query);
        }
    }

    normalized
}

/// True when the serialized URL, minus its fragment, mentions a query marker
fn keeps_query(url: &Url) -> bool {
    let mut without_fragment = url.clone();
    without_fragment.set_fragment(None);
    let text = without_fragment.as_str();
    QUERY_KEEP_MARKERS.iter().any(|marker| text.contains(marker))
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Detects `scheme://` or `mailto:`-style prefixes other than http(s)
fn has_foreign_scheme(s: &str) -> bool {
    if has_http_scheme(s) {
        return false;
    }

    let Some((scheme, rest)) = s.split_once(':') else {
        return false;
    };

    let looks_like_scheme = !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphabetic())
        && !rest.chars().next().map_or(false, |c| c.is_ascii_digit());

    // `acme.io:8080` is a host with a port, not a scheme
    looks_like_scheme
        && (rest.starts_with("//") || matches!(scheme, "mailto" | "tel" | "javascript" | "data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://acme.io"));
        assert!(is_valid_url("http://acme.io/path?x=1"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url("acme.io"));
        assert!(!is_valid_url("ftp://acme.io"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("acme.io"), "https://acme.io");
        assert_eq!(ensure_scheme("http://acme.io"), "http://acme.io");
        assert_eq!(ensure_scheme("HTTPS://acme.io"), "HTTPS://acme.io");
        assert_eq!(ensure_scheme("  acme.io  "), "https://acme.io");
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(normalize_url("https://acme.io/"), "https://acme.io");
        assert_eq!(normalize_url("https://acme.io/about/"), "https://acme.io/about");
    }

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_url("acme.io"), "https://acme.io");
        assert_eq!(normalize_url("www.acme.io/team"), "https://www.acme.io/team");
    }

    #[test]
    fn test_normalize_drops_query_and_fragment() {
        assert_eq!(
            normalize_url("https://acme.io/blog?utm_source=x#top"),
            "https://acme.io/blog"
        );
    }

    #[test]
    fn test_normalize_keeps_significant_query() {
        assert_eq!(
            normalize_url("https://shop.io/item?id=9"),
            "https://shop.io/item?id=9"
        );
        assert_eq!(
            normalize_url("https://shop.io/list?page=2"),
            "https://shop.io/list?page=2"
        );
    }

    #[test]
    fn test_normalize_lowercases_host_and_drops_default_port() {
        assert_eq!(normalize_url("https://ACME.io:443/X"), "https://acme.io/X");
        assert_eq!(normalize_url("http://acme.io:8080/"), "http://acme.io:8080");
    }

    #[test]
    fn test_normalize_edge_inputs() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("ftp://files.acme.io/"), "ftp://files.acme.io/");
        assert_eq!(normalize_url("mailto:hi@acme.io"), "mailto:hi@acme.io");
        assert_eq!(normalize_url("acme.io:8080/x/"), "https://acme.io:8080/x");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "https://acme.io/",
            "acme.io//deep//",
            "https://shop.io/product/?id=1#frag",
            "https://acme.io/?a=1#product",
            "HTTP://Acme.IO/Path/",
            "https://acme.io/page?q=a%20b",
            "not a url at all",
        ];

        for input in inputs {
            let once = normalize_url(input);
            let twice = normalize_url(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }
}
