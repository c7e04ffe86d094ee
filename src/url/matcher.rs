/// Checks if a host belongs to a domain
///
/// A host matches when it equals the domain or is any subdomain of it.
/// Both arguments are expected to be lowercase.
///
/// # Examples
///
/// ```
/// use schema_crawler::url::matches_domain;
///
/// assert!(matches_domain("facebook.com", "facebook.com"));
/// assert!(matches_domain("facebook.com", "m.facebook.com"));
/// assert!(!matches_domain("t.co", "microsoft.com"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_domain("example.com", "example.com"));
        assert!(matches_domain("maps.google.com", "maps.google.com"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(matches_domain("youtube.com", "www.youtube.com"));
        assert!(matches_domain("youtube.com", "m.youtube.com"));
        assert!(matches_domain("goo.gl", "maps.app.goo.gl"));
    }

    #[test]
    fn test_no_partial_label_match() {
        assert!(!matches_domain("t.co", "microsoft.com"));
        assert!(!matches_domain("t.co", "reddit.com"));
        assert!(!matches_domain("bit.ly", "orbit.ly"));
        assert!(!matches_domain("example.com", "example.com.org"));
    }

    #[test]
    fn test_sibling_subdomain_no_match() {
        assert!(!matches_domain("docs.google.com", "google.com"));
        assert!(!matches_domain("maps.google.com", "mail.google.com"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!matches_domain("", "example.com"));
        assert!(!matches_domain("example.com", ""));
        assert!(!matches_domain("", ""));
    }
}
