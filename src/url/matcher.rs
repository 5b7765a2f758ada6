/// Checks if a host belongs to a domain entry
///
/// A plain entry matches the host itself and every subdomain of it, so
/// `facebook.com` matches `facebook.com`, `www.facebook.com` and
/// `m.facebook.com`. A leading `*.` on the entry is accepted and means the
/// same thing.
///
/// Both sides are expected to be lowercase.
///
/// # Examples
///
/// ```
/// use contact_scout::url::matches_domain;
///
/// assert!(matches_domain("facebook.com", "facebook.com"));
/// assert!(matches_domain("facebook.com", "www.facebook.com"));
/// assert!(matches_domain("*.github.com", "gist.github.com"));
/// assert!(!matches_domain("facebook.com", "notfacebook.com"));
/// ```
pub fn matches_domain(entry: &str, host: &str) -> bool {
    let base = entry.strip_prefix("*.").unwrap_or(entry);
    if base.is_empty() || host.is_empty() {
        return false;
    }

    host == base
        || (host.len() > base.len()
            && host.ends_with(base)
            && host.as_bytes()[host.len() - base.len() - 1] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_domain("x.com", "x.com"));
        assert!(matches_domain("bard.google.com", "bard.google.com"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(matches_domain("x.com", "www.x.com"));
        assert!(matches_domain("google.com", "mail.google.com"));
        assert!(matches_domain("google.com", "a.b.c.google.com"));
    }

    #[test]
    fn test_no_partial_match() {
        assert!(!matches_domain("x.com", "box.com"));
        assert!(!matches_domain("x.com", "x.com.evil.io"));
        assert!(!matches_domain("meta.com", "metacompany.com"));
        assert!(!matches_domain("bard.google.com", "google.com"));
    }

    #[test]
    fn test_wildcard_prefix_accepted() {
        assert!(matches_domain("*.github.com", "github.com"));
        assert!(matches_domain("*.github.com", "api.github.com"));
        assert!(!matches_domain("*.github.com", "github.io"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!matches_domain("", "acme.io"));
        assert!(!matches_domain("acme.io", ""));
        assert!(!matches_domain("*.", "acme.io"));
    }
}
