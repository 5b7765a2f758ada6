use super::normalize::ensure_scheme;
use url::Url;

/// Extracts the lowercase host from a parsed URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a possibly scheme-less URL string and returns its lowercase host
pub fn host_of(url_str: &str) -> Option<String> {
    if url_str.trim().is_empty() {
        return None;
    }

    Url::parse(&ensure_scheme(url_str))
        .ok()
        .and_then(|url| extract_domain(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_host_of_adds_scheme() {
        assert_eq!(host_of("www.Acme.io/about"), Some("www.acme.io".to_string()));
        assert_eq!(host_of("http://acme.io"), Some("acme.io".to_string()));
    }

    #[test]
    fn test_host_of_rejects_garbage() {
        assert_eq!(host_of(""), None);
        assert_eq!(host_of("not a url"), None);
    }
}
