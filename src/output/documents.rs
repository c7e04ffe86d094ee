//! JSON documents written into the artifact tree

use crate::crawler::{take_chars, Metadata, PageRecord};
use crate::schema::SchemaDocument;
use serde::{Deserialize, Serialize};

/// Characters of the text excerpt kept in a page document
pub const CONTENT_PREVIEW_CHARS: usize = 1000;

/// Summary block at the top of a page document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    pub description: String,
    pub word_count: usize,
    pub crawled_at: String,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub internal_links_count: usize,
    pub external_links_count: usize,
}

impl PageInfo {
    pub fn from_record(record: &PageRecord, crawled_at: &str) -> Self {
        let metadata = &record.metadata;
        Self {
            url: record.url.clone(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            word_count: metadata.word_count,
            crawled_at: crawled_at.to_string(),
            h1_tags: metadata.h1_tags.clone(),
            h2_tags: metadata.h2_tags.clone(),
            internal_links_count: metadata.internal_links.len(),
            external_links_count: metadata.external_links.len(),
        }
    }
}

/// Contents of one `<page>.json` file
#[derive(Debug, Serialize)]
pub struct PageDocument<'a> {
    pub page_info: PageInfo,
    pub json_ld: &'a SchemaDocument,
    pub metadata: &'a Metadata,
    pub content_preview: &'a str,
}

impl<'a> PageDocument<'a> {
    pub fn new(record: &'a PageRecord, schema: &'a SchemaDocument, crawled_at: &str) -> Self {
        Self {
            page_info: PageInfo::from_record(record, crawled_at),
            json_ld: schema,
            metadata: &record.metadata,
            content_preview: take_chars(&record.text_content, CONTENT_PREVIEW_CHARS),
        }
    }
}

/// `website` block of the index manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteInfo {
    pub domain: String,
    pub crawl_date: String,
    pub total_pages: usize,
    pub job_id: String,
}

/// One page listed in the index manifest and the loader script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub filename: String,
    pub url: String,
    pub title: String,
}

/// `usage_instructions` block of the index manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInstructions {
    pub self_hosted: String,
    pub cdn_integration: String,
    pub script_tag: String,
}

impl UsageInstructions {
    /// Builds the instructions for a tree published at `publish_url`
    pub fn for_publish_url(publish_url: &str) -> Self {
        Self {
            self_hosted: "Copy all JSON files to your server and reference them individually"
                .to_string(),
            cdn_integration: format!("Use the published files: {}", publish_url),
            script_tag: script_tag(publish_url),
        }
    }
}

/// Contents of `index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub website: WebsiteInfo,
    pub pages: Vec<PageEntry>,
    pub usage_instructions: UsageInstructions,
}

/// Returns the `<script>` tag that loads the published loader
pub fn script_tag(publish_url: &str) -> String {
    format!(r#"<script src="{}schema-loader.js"></script>"#, publish_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fallback_document;

    fn record() -> PageRecord {
        PageRecord {
            url: "https://example.com/about".to_string(),
            metadata: Metadata {
                title: "About".to_string(),
                internal_links: vec!["https://example.com/".to_string(); 3],
                external_links: vec!["https://other.org/".to_string()],
                ..Metadata::default()
            },
            markdown: String::new(),
            html: String::new(),
            text_content: "é".repeat(1200),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_page_document_shape() {
        let record = record();
        let schema = fallback_document(&record);
        let document = PageDocument::new(&record, &schema, "2024-01-01T00:00:00+00:00");

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["page_info"]["url"], "https://example.com/about");
        assert_eq!(value["page_info"]["internal_links_count"], 3);
        assert_eq!(value["page_info"]["external_links_count"], 1);
        assert_eq!(value["json_ld"]["@type"], "WebPage");
        assert_eq!(value["metadata"]["title"], "About");
        assert_eq!(
            value["content_preview"].as_str().unwrap().chars().count(),
            CONTENT_PREVIEW_CHARS
        );
    }

    #[test]
    fn test_usage_instructions() {
        let usage = UsageInstructions::for_publish_url("http://localhost:8000/cdn/example.com/");
        assert_eq!(
            usage.script_tag,
            r#"<script src="http://localhost:8000/cdn/example.com/schema-loader.js"></script>"#
        );
        assert!(usage.cdn_integration.ends_with("/cdn/example.com/"));
    }
}
