//! Page records produced by the extractor

use serde::{Deserialize, Serialize};

/// Title given to pages whose markup could not be processed
pub const DEGRADED_TITLE: &str = "Error processing page";

/// Structured metadata extracted from a page
///
/// Every field has an empty/zero default so a degraded extraction still
/// yields a complete value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub robots: String,
    pub keywords: String,
    pub canonical_url: String,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    pub image_alt_texts: Vec<String>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub word_count: usize,
    pub language: String,
}

/// Everything captured from one crawled page
///
/// Created once by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Normalized URL the page was fetched from
    pub url: String,

    pub metadata: Metadata,

    /// Markdown rendering of the raw markup
    pub markdown: String,

    /// Raw markup as returned by the renderer
    pub html: String,

    /// Whitespace-collapsed visible text, capped at 1000 characters
    pub text_content: String,

    /// Crawlable outbound links, normalized, deduplicated, in document order
    pub links: Vec<String>,
}

impl PageRecord {
    /// Builds the minimal record used when extraction faults
    pub fn degraded(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            metadata: Metadata {
                title: DEGRADED_TITLE.to_string(),
                ..Metadata::default()
            },
            markdown: String::new(),
            html: html.to_string(),
            text_content: String::new(),
            links: Vec::new(),
        }
    }
}

/// Truncates `text` to `max_chars` characters, appending "..." when cut
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Returns at most the first `max_chars` characters of `text`
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_record() {
        let record = PageRecord::degraded("https://example.com/", "<html>");
        assert_eq!(record.metadata.title, DEGRADED_TITLE);
        assert_eq!(record.metadata.word_count, 0);
        assert!(record.metadata.h1_tags.is_empty());
        assert_eq!(record.html, "<html>");
        assert!(record.links.is_empty());
    }

    #[test]
    fn test_truncate_with_marker() {
        assert_eq!(truncate_with_marker("short", 10), "short");
        assert_eq!(truncate_with_marker("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_with_marker("longer than ten", 10), "longer tha...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ééééé";
        assert_eq!(truncate_with_marker(text, 3), "ééé...");
        assert_eq!(take_chars(text, 2), "éé");
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("abcdef", 3), "abc");
        assert_eq!(take_chars("ab", 3), "ab");
        assert_eq!(take_chars("", 3), "");
    }
}
