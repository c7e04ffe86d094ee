//! Content extraction from rendered markup
//!
//! This module turns raw markup into a [`PageRecord`]:
//! - Metadata (title, meta tags, canonical URL, language)
//! - Headings, image alt texts and link classification
//! - Word count and a bounded text excerpt
//! - A markdown rendering of the page
//! - Crawlable outbound links for the frontier
//!
//! Extraction never fails. Internal faults produce a degraded record.

use super::page::{truncate_with_marker, Metadata, PageRecord};
use crate::url::{extract_site, is_crawlable, normalize_url};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Elements whose content is not part of the page's visible text
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript",
];

/// Maximum length of the text excerpt, in characters
const EXCERPT_CHARS: usize = 1000;

/// Faults that force a degraded record
#[derive(Debug, Error)]
enum ExtractError {
    #[error("invalid page URL {url}: {source}")]
    PageUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid selector {0}")]
    Selector(String),

    #[error("markdown conversion failed: {0}")]
    Markdown(#[from] std::io::Error),
}

/// Extracts a page record from raw markup
///
/// # Arguments
///
/// * `markup` - Raw markup returned by the renderer
/// * `page_url` - Normalized URL the markup was fetched from
///
/// # Example
///
/// ```
/// use schema_crawler::extract;
///
/// let html = r#"<html><head><title> Home </title></head>
///     <body><h1>Welcome</h1><a href="/about">About</a></body></html>"#;
/// let record = extract(html, "https://example.com/");
/// assert_eq!(record.metadata.title, "Home");
/// assert_eq!(record.metadata.h1_tags, vec!["Welcome"]);
/// assert_eq!(record.links, vec!["https://example.com/about"]);
/// ```
pub fn extract(markup: &str, page_url: &str) -> PageRecord {
    match try_extract(markup, page_url) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Error extracting content for {}: {}", page_url, e);
            PageRecord::degraded(page_url, markup)
        }
    }
}

fn try_extract(markup: &str, page_url: &str) -> Result<PageRecord, ExtractError> {
    let base = Url::parse(page_url).map_err(|e| ExtractError::PageUrl {
        url: page_url.to_string(),
        source: e,
    })?;
    let page_site = extract_site(&base);

    let document = Html::parse_document(markup);
    let mut metadata = extract_head_metadata(&document)?;

    let content = walk_content(&document);
    metadata.h1_tags = content.h1;
    metadata.h2_tags = content.h2;
    metadata.h3_tags = content.h3;
    metadata.image_alt_texts = content.alt_texts;

    for href in &content.hrefs {
        let Some(link) = resolve_href(&base, href) else {
            continue;
        };
        if !is_crawlable(&link) {
            continue;
        }
        let same_site = Url::parse(&link)
            .ok()
            .and_then(|u| extract_site(&u))
            .is_some_and(|site| Some(site) == page_site);
        if same_site {
            metadata.internal_links.push(link);
        } else {
            metadata.external_links.push(link);
        }
    }

    let clean_text = collapse_whitespace(&content.text);
    metadata.word_count = clean_text.split_whitespace().count();

    let markdown = htmd::convert(markup)?;
    let links = discover_links(&document, &base)?;

    Ok(PageRecord {
        url: page_url.to_string(),
        metadata,
        markdown,
        html: markup.to_string(),
        text_content: truncate_with_marker(&clean_text, EXCERPT_CHARS),
        links,
    })
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// Reads title, meta tags, canonical link and language
fn extract_head_metadata(document: &Html) -> Result<Metadata, ExtractError> {
    let mut metadata = Metadata::default();

    if let Some(title) = document.select(&selector("title")?).next() {
        metadata.title = title.text().collect::<String>().trim().to_string();
    }

    let mut language_meta = None;
    for meta in document.select(&selector("meta[name]")?) {
        let element = meta.value();
        let (Some(name), content) = (element.attr("name"), element.attr("content")) else {
            continue;
        };
        let content = content.unwrap_or_default().to_string();

        // First occurrence wins for each name
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "description" => &mut metadata.description,
            "robots" => &mut metadata.robots,
            "keywords" => &mut metadata.keywords,
            "language" => {
                language_meta.get_or_insert(content);
                continue;
            }
            _ => continue,
        };
        if slot.is_empty() {
            *slot = content;
        }
    }

    if let Some(canonical) = document.select(&selector("link[rel=canonical]")?).next() {
        metadata.canonical_url = canonical.value().attr("href").unwrap_or_default().to_string();
    }

    metadata.language = match language_meta {
        Some(language) => language,
        None => document
            .select(&selector("html[lang]")?)
            .next()
            .and_then(|html| html.value().attr("lang"))
            .unwrap_or_default()
            .to_string(),
    };

    Ok(metadata)
}

/// Content gathered outside non-content elements
#[derive(Debug, Default)]
struct ContentWalk {
    h1: Vec<String>,
    h2: Vec<String>,
    h3: Vec<String>,
    alt_texts: Vec<String>,
    hrefs: Vec<String>,
    text: String,
}

/// Walks the document in order, skipping non-content subtrees
fn walk_content(document: &Html) -> ContentWalk {
    let mut walk = ContentWalk::default();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => walk.text.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if NON_CONTENT_TAGS.contains(&name) {
                    continue;
                }

                match name {
                    "h1" | "h2" | "h3" => {
                        let heading = ElementRef::wrap(node)
                            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                            .unwrap_or_default();
                        if !heading.is_empty() {
                            match name {
                                "h1" => walk.h1.push(heading),
                                "h2" => walk.h2.push(heading),
                                _ => walk.h3.push(heading),
                            }
                        }
                    }
                    "img" => {
                        if let Some(alt) = element.attr("alt").map(str::trim) {
                            if !alt.is_empty() {
                                walk.alt_texts.push(alt.to_string());
                            }
                        }
                    }
                    "a" => {
                        if let Some(href) = element.attr("href") {
                            walk.hrefs.push(href.to_string());
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        // Reverse so children pop in document order
        for child in node.children().rev() {
            stack.push(child);
        }
    }

    walk
}

/// Collects every crawlable link in the document, deduplicated in order
fn discover_links(document: &Html, base: &Url) -> Result<Vec<String>, ExtractError> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&selector("a[href]")?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve_href(base, href) else {
            continue;
        };
        if is_crawlable(&link) && seen.insert(link.clone()) {
            links.push(link);
        }
    }

    Ok(links)
}

/// Resolves an href against the page URL and normalizes it
///
/// Returns `None` for empty hrefs, same-page anchors and hrefs that cannot
/// be resolved.
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    base.join(href)
        .ok()
        .map(|absolute| normalize_url(absolute.as_str()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
