use crate::url::domain::extract_site;
use crate::url::matcher::matches_domain;
use std::fmt;
use url::Url;

/// Path suffixes that never lead to crawlable pages
const IGNORED_EXTENSIONS: &[&str] = &[
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // archives
    ".zip", ".rar", ".tar", ".gz", ".7z",
    // images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".ico",
    // video
    ".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm",
    // audio
    ".mp3", ".wav", ".flac", ".aac", ".ogg",
    // executables and packages
    ".exe", ".msi", ".dmg", ".deb", ".rpm",
    // assets and data files
    ".css", ".js", ".xml", ".json", ".txt",
];

/// Schemes that are recognised and explicitly refused
const NON_CRAWLABLE_SCHEMES: &[&str] = &["mailto", "tel", "ftp", "sftp"];

/// Social and utility services whose pages carry no useful site content
const BLOCKED_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "pinterest.com",
    "tiktok.com",
    "snapchat.com",
    "maps.google.com",
    "maps.app.goo.gl",
    "goo.gl",
    "bit.ly",
    "t.co",
    "tinyurl.com",
    "forms.gle",
    "docs.google.com",
];

/// Professional network whose organisation profiles are admitted
const PROFILE_NETWORK_DOMAIN: &str = "linkedin.com";

/// Path segments that mark an organisation profile on the professional network
const PROFILE_PATH_MARKERS: &[&str] = &["/company/", "/school/", "/showcase/"];

/// Why a URL was refused admission to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not an absolute URL
    Malformed,
    /// A `#...` link pointing into the current page
    BareFragment,
    /// A `javascript:` pseudo-link
    Script,
    /// mailto, tel, ftp or sftp
    NonCrawlableScheme(String),
    /// Any other non-http(s) scheme
    UnsupportedScheme(String),
    /// Absolute URL without a host
    MissingHost,
    /// Path names a document, archive, media file, asset or data file
    IgnoredExtension,
    /// Host is on the social/utility-service blocklist
    BlockedHost(String),
    /// Professional-network page that is not an organisation profile
    PersonalProfile,
    /// Host differs from the scope domain
    OutOfScope(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed URL"),
            Self::BareFragment => write!(f, "bare fragment link"),
            Self::Script => write!(f, "javascript link"),
            Self::NonCrawlableScheme(s) => write!(f, "non-crawlable scheme '{}'", s),
            Self::UnsupportedScheme(s) => write!(f, "unsupported scheme '{}'", s),
            Self::MissingHost => write!(f, "missing host"),
            Self::IgnoredExtension => write!(f, "ignored file extension"),
            Self::BlockedHost(h) => write!(f, "blocked host '{}'", h),
            Self::PersonalProfile => write!(f, "not an organisation profile"),
            Self::OutOfScope(h) => write!(f, "host '{}' is out of scope", h),
        }
    }
}

/// Checks every admission rule except scoping
///
/// # Rules
///
/// A URL is refused when it:
/// 1. is a bare `#fragment` or a `javascript:` link
/// 2. does not parse as an absolute URL, or has no host
/// 3. uses mailto/tel/ftp/sftp or any other non-http(s) scheme
/// 4. has a path ending in an ignored extension
/// 5. points at the professional network outside an organisation profile
/// 6. points at a blocked social/utility host
pub fn check_crawlable(url_str: &str) -> Result<Url, Rejection> {
    let trimmed = url_str.trim();

    if trimmed.starts_with('#') {
        return Err(Rejection::BareFragment);
    }

    if trimmed
        .get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
    {
        return Err(Rejection::Script);
    }

    let url = Url::parse(trimmed).map_err(|_| Rejection::Malformed)?;

    let scheme = url.scheme();
    if NON_CRAWLABLE_SCHEMES.contains(&scheme) {
        return Err(Rejection::NonCrawlableScheme(scheme.to_string()));
    }
    if scheme != "http" && scheme != "https" {
        return Err(Rejection::UnsupportedScheme(scheme.to_string()));
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_lowercase(),
        _ => return Err(Rejection::MissingHost),
    };

    let path = url.path().to_lowercase();
    if IGNORED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Err(Rejection::IgnoredExtension);
    }

    if matches_domain(PROFILE_NETWORK_DOMAIN, &host) {
        // Organisation profiles are admitted, everything else on the network is not
        if PROFILE_PATH_MARKERS.iter().any(|m| url.path().contains(m)) {
            return Ok(url);
        }
        return Err(Rejection::PersonalProfile);
    }

    if BLOCKED_DOMAINS.iter().any(|d| matches_domain(d, &host)) {
        return Err(Rejection::BlockedHost(host));
    }

    Ok(url)
}

/// Checks every admission rule, including scoping to the crawl's domain
///
/// `scope_domain` is the site identity (host plus explicit port) of the seed.
pub fn check_admissible(
    url_str: &str,
    scope_domain: &str,
    allow_cross_domain: bool,
) -> Result<Url, Rejection> {
    let url = check_crawlable(url_str)?;

    if !allow_cross_domain {
        let site = extract_site(&url).unwrap_or_default();
        if !site.eq_ignore_ascii_case(scope_domain) {
            return Err(Rejection::OutOfScope(site));
        }
    }

    Ok(url)
}

/// Returns true if the URL may be crawled at all, ignoring scope
pub fn is_crawlable(url_str: &str) -> bool {
    check_crawlable(url_str).is_ok()
}

/// Returns true if the URL may enter the frontier of a crawl scoped to `scope_domain`
///
/// # Examples
///
/// ```
/// use schema_crawler::url::is_admissible;
///
/// assert!(is_admissible("https://example.com/about", "example.com", false));
/// assert!(!is_admissible("https://other.com/", "example.com", false));
/// assert!(is_admissible("https://other.com/", "example.com", true));
/// assert!(!is_admissible("https://example.com/brochure.pdf", "example.com", false));
/// ```
pub fn is_admissible(url_str: &str, scope_domain: &str, allow_cross_domain: bool) -> bool {
    check_admissible(url_str, scope_domain, allow_cross_domain).is_ok()
}
