use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host without any port, or `None` when the URL has
/// no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use schema_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the site identity of a URL: its host plus any explicit port
///
/// Two URLs belong to the same site when their site identities are equal.
/// This is what crawl scoping and internal/external link classification
/// compare.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use schema_crawler::url::extract_site;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(extract_site(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_site(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Parses an absolute http(s) URL that has a host
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
