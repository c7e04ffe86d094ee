use url::Url;

/// Normalizes a URL for deduplication
///
/// Only the fragment is removed; scheme, host, path and query are kept as the
/// URL parser serializes them. The result is stable under repeated
/// application, so `normalize_url(&normalize_url(u)) == normalize_url(u)`.
///
/// Strings that do not parse as absolute URLs are returned with any `#...`
/// suffix removed and otherwise untouched.
///
/// # Examples
///
/// ```
/// use schema_crawler::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://example.com/page?id=2#reviews"),
///     "https://example.com/page?id=2"
/// );
/// ```
pub fn normalize_url(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => strip_fragment(url_str).to_string(),
    }
}

fn strip_fragment(url_str: &str) -> &str {
    match url_str.find('#') {
        Some(index) => &url_str[..index],
        None => url_str,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_query_preserved() {
        assert_eq!(
            normalize_url("https://example.com/page?b=2&a=1#top"),
            "https://example.com/page?b=2&a=1"
        );
    }

    #[test]
    fn test_path_preserved() {
        assert_eq!(
            normalize_url("https://example.com/Docs/Guide/"),
            "https://example.com/Docs/Guide/"
        );
    }

    #[test]
    fn test_empty_fragment_removed() {
        assert_eq!(
            normalize_url("https://example.com/page#"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://example.com",
            "HTTP://Example.COM/a/b?x=1#frag",
            "https://example.com/a%20b/#x",
            "not a url#frag",
            "",
        ];

        for input in inputs {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_fragment_never_changes_identity() {
        let bases = [
            "https://example.com/",
            "https://example.com/page?q=1",
            "https://example.com/blog/post-1",
        ];

        for base in bases {
            assert_eq!(
                normalize_url(&format!("{base}#frag")),
                normalize_url(base)
            );
        }
    }

    #[test]
    fn test_unparseable_input() {
        assert_eq!(normalize_url("/relative/path#top"), "/relative/path");
        assert_eq!(normalize_url("plain text"), "plain text");
    }
}
