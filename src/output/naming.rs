//! Filesystem-safe naming for artifact files

use std::collections::HashSet;
use url::Url;

/// Filename used for the root page of a site
pub const HOMEPAGE_FILENAME: &str = "homepage.json";

/// Filename of the index manifest
pub const INDEX_FILENAME: &str = "index.json";

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`
///
/// ```
/// use schema_crawler::output::clean_domain;
///
/// assert_eq!(clean_domain("localhost:8080"), "localhost_8080");
/// assert_eq!(clean_domain("www.example.com"), "www.example.com");
/// ```
pub fn clean_domain(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect()
}

/// Derives a page document filename from a page URL
///
/// The root path maps to `homepage.json`. Any other path has its leading and
/// trailing slashes trimmed, inner slashes and unsafe characters replaced by
/// `_`, and `.json` appended unless already present. Query strings do not
/// participate; pages that differ only by query collide and are
/// disambiguated by [`FilenameAllocator`].
pub fn page_filename(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return HOMEPAGE_FILENAME.to_string();
    }

    let mut filename: String = trimmed
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect();
    if !filename.ends_with(".json") {
        filename.push_str(".json");
    }
    filename
}

/// Hands out unique filenames within one artifact tree
///
/// The first request for a name gets it unchanged. Later requests get
/// `_1`, `_2`, … inserted before the extension. The index manifest's name
/// is reserved up front.
#[derive(Debug)]
pub struct FilenameAllocator {
    taken: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new() -> Self {
        let mut taken = HashSet::new();
        taken.insert(INDEX_FILENAME.to_string());
        Self { taken }
    }

    /// Returns a filename not handed out before, derived from `wanted`
    pub fn allocate(&mut self, wanted: &str) -> String {
        if self.taken.insert(wanted.to_string()) {
            return wanted.to_string();
        }

        let (stem, extension) = match wanted.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (wanted, String::new()),
        };

        let mut counter = 1;
        loop {
            let candidate = format!("{}_{}{}", stem, counter, extension);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Default for FilenameAllocator {
    fn default() -> Self {
        Self::new()
    }
}
