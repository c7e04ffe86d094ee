//! Prompt construction for schema generation

use super::classify::ContentType;
use crate::crawler::{take_chars, PageRecord};

/// Characters of markdown included in a prompt
pub const MARKDOWN_CHARS: usize = 3000;

const REQUIREMENTS: &str = "\
Requirements:
1. Use schema.org vocabulary with @context
2. Include appropriate @type based on content analysis
3. Add Organization schema if business-related
4. Include BreadcrumbList for navigation
5. Add relevant properties like name, description, url
6. Include dateModified as current date
7. Add author/publisher information when applicable
8. Ensure all URLs are absolute

Return only valid JSON-LD without markdown formatting.";

/// Builds the inference prompt for one page
///
/// The prompt is bounded: at most 3 H1s, 5 H2s and the first
/// [`MARKDOWN_CHARS`] characters of markdown are included.
pub fn build_prompt(record: &PageRecord, content_type: ContentType) -> String {
    let metadata = &record.metadata;
    let h1: Vec<&String> = metadata.h1_tags.iter().take(3).collect();
    let h2: Vec<&String> = metadata.h2_tags.iter().take(5).collect();

    format!(
        "Generate a comprehensive JSON-LD schema for this webpage. Focus on creating rich, \
semantic markup that will help search engines and AI systems understand the content.

Page Details:
URL: {url}
Title: {title}
Description: {description}
Content Type: {content_type}
H1 Tags: {h1}
H2 Tags: {h2}
Word Count: {word_count}

Content Preview:
{preview}

{requirements}
",
        url = record.url,
        title = metadata.title,
        description = metadata.description,
        content_type = content_type,
        h1 = serde_json::to_string(&h1).unwrap_or_default(),
        h2 = serde_json::to_string(&h2).unwrap_or_default(),
        word_count = metadata.word_count,
        preview = take_chars(&record.markdown, MARKDOWN_CHARS),
        requirements = REQUIREMENTS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Metadata;

    fn record() -> PageRecord {
        PageRecord {
            url: "https://example.com/about".to_string(),
            metadata: Metadata {
                title: "About Acme".to_string(),
                description: "Who we are".to_string(),
                h1_tags: (1..=5).map(|i| format!("H1 {i}")).collect(),
                h2_tags: (1..=8).map(|i| format!("H2 {i}")).collect(),
                word_count: 321,
                ..Metadata::default()
            },
            markdown: "x".repeat(5000),
            html: String::new(),
            text_content: String::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_prompt_contains_page_details() {
        let prompt = build_prompt(&record(), ContentType::AboutPage);

        assert!(prompt.contains("URL: https://example.com/about"));
        assert!(prompt.contains("Title: About Acme"));
        assert!(prompt.contains("Description: Who we are"));
        assert!(prompt.contains("Content Type: AboutPage"));
        assert!(prompt.contains("Word Count: 321"));
        assert!(prompt.contains("BreadcrumbList"));
    }

    #[test]
    fn test_prompt_is_bounded() {
        let prompt = build_prompt(&record(), ContentType::WebPage);

        assert!(prompt.contains(r#"H1 Tags: ["H1 1","H1 2","H1 3"]"#));
        assert!(!prompt.contains("H1 4"));
        assert!(prompt.contains("H2 5"));
        assert!(!prompt.contains("H2 6"));
        assert!(prompt.contains(&"x".repeat(MARKDOWN_CHARS)));
        assert!(!prompt.contains(&"x".repeat(MARKDOWN_CHARS + 1)));
    }
}
