//! URL handling module for Schema-Crawler
//!
//! This module provides URL normalization, domain extraction, host matching,
//! and the admission policy that decides which URLs may enter the crawl
//! frontier.

mod admission;
mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use admission::{
    check_admissible, check_crawlable, is_admissible, is_crawlable, Rejection,
};
pub use domain::{extract_domain, extract_site, parse_http_url};
pub use matcher::matches_domain;
pub use normalize::normalize_url;

use crate::UrlResult;

/// Returns the scope domain (site identity) of a seed URL
///
/// # Examples
///
/// ```
/// use schema_crawler::url::scope_of;
///
/// assert_eq!(scope_of("https://Example.com/start").unwrap(), "example.com");
/// assert_eq!(scope_of("http://localhost:3000/").unwrap(), "localhost:3000");
/// ```
pub fn scope_of(seed_url: &str) -> UrlResult<String> {
    let url = parse_http_url(seed_url)?;
    extract_site(&url).ok_or(crate::UrlError::MissingDomain)
}
