//! Client-side schema loader script
//!
//! The loader is plain JavaScript that, on DOM ready, works out which page
//! document belongs to the current page, fetches it from the published tree
//! and injects its `json_ld` as a `<script type="application/ld+json">` tag.
//!
//! Which document belongs to which page is decided here, in Rust, by
//! [`LoaderIndex`]; the script only looks the answer up. The template uses
//! block comments only and ends every statement with `;` or a brace, so
//! [`minify_script`] can collapse line breaks without changing what the
//! script does.

use super::documents::PageEntry;
use super::naming::HOMEPAGE_FILENAME;
use super::traits::OutputResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

const LOADER_TEMPLATE: &str = r#"/*
 * Schema Loader for __DOMAIN__
 * Generated on __GENERATED_AT__
 * Job ID: __JOB_ID__
 */
(function() {
    'use strict';

    const SCHEMA_BASE_URL = __BASE_URL__;
    const PAGE_SCHEMAS = __PAGE_SCHEMAS__;
    const PAGE_INDEX = __PAGE_INDEX__;

    function lookup(table, key) {
        return Object.prototype.hasOwnProperty.call(table, key) ? table[key] : null;
    }

    function getCurrentPageSchema() {
        /* Exact URL, then path, then the fallback page */
        return lookup(PAGE_INDEX.by_url, window.location.href)
            || lookup(PAGE_INDEX.by_path, window.location.pathname)
            || PAGE_INDEX.fallback;
    }

    async function loadAndInjectSchema() {
        try {
            const schemaFile = getCurrentPageSchema();
            if (!schemaFile) {
                console.warn('No schema file found for current page');
                return;
            }

            const response = await fetch(SCHEMA_BASE_URL + schemaFile);
            if (!response.ok) {
                throw new Error('Failed to load schema: ' + response.status);
            }

            const schemaData = await response.json();
            const jsonLd = schemaData.json_ld;

            const existing = document.querySelector('script[type="application/ld+json"][data-crawler-generated]');
            if (existing) {
                existing.remove();
            }

            const script = document.createElement('script');
            script.type = 'application/ld+json';
            script.setAttribute('data-crawler-generated', 'true');
            script.textContent = JSON.stringify(jsonLd, null, 2);
            document.head.appendChild(script);

            window.dispatchEvent(new CustomEvent('schemaLoaded', {
                detail: { schemaFile: schemaFile, jsonLd: jsonLd, pageInfo: schemaData.page_info }
            }));
        } catch (error) {
            console.error('Error loading schema:', error);
        }
    }

    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', loadAndInjectSchema);
    } else {
        loadAndInjectSchema();
    }

    window.SchemaLoader = {
        reload: loadAndInjectSchema,
        getAvailableSchemas: function() { return PAGE_SCHEMAS; },
        getCurrentSchema: getCurrentPageSchema,
        baseUrl: SCHEMA_BASE_URL
    };
})();
"#;

/// Lookup table the loader script resolves the current page with
///
/// Resolution order is exact URL, then URL path, then the fallback: the
/// homepage document when there is one, else the first page. When several
/// pages share a URL or path, the earliest one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderIndex {
    pub by_url: BTreeMap<String, String>,
    pub by_path: BTreeMap<String, String>,
    pub fallback: Option<String>,
}

impl LoaderIndex {
    pub fn build(pages: &[PageEntry]) -> Self {
        let mut index = Self::default();

        for page in pages {
            index
                .by_url
                .entry(page.url.clone())
                .or_insert_with(|| page.filename.clone());
            if let Ok(url) = Url::parse(&page.url) {
                index
                    .by_path
                    .entry(url.path().to_string())
                    .or_insert_with(|| page.filename.clone());
            }
        }

        index.fallback = pages
            .iter()
            .find(|page| page.filename == HOMEPAGE_FILENAME)
            .or_else(|| pages.first())
            .map(|page| page.filename.clone());

        index
    }

    /// Returns the document filename for a browser location
    pub fn resolve(&self, location: &str) -> Option<&str> {
        if let Some(filename) = self.by_url.get(location) {
            return Some(filename.as_str());
        }

        let by_path = Url::parse(location)
            .ok()
            .and_then(|url| self.by_path.get(url.path()));
        by_path.or(self.fallback.as_ref()).map(String::as_str)
    }
}

/// Renders the loader script for one artifact tree
///
/// # Arguments
///
/// * `domain` - Clean domain of the crawled site
/// * `job_id` - Job that produced the tree
/// * `base_url` - URL the tree is published under, ending in `/`
/// * `pages` - The same page list written to `index.json`
/// * `generated_at` - Timestamp written into the header comment
pub fn render_loader_script(
    domain: &str,
    job_id: &str,
    base_url: &str,
    pages: &[PageEntry],
    generated_at: &str,
) -> OutputResult<String> {
    let base_url_literal = serde_json::to_string(base_url)?;
    let pages_literal = serde_json::to_string_pretty(pages)?;
    let index_literal = serde_json::to_string_pretty(&LoaderIndex::build(pages))?;

    Ok(fill_placeholders(
        LOADER_TEMPLATE,
        &[
            ("__DOMAIN__", sanitize_comment(domain).as_str()),
            ("__GENERATED_AT__", sanitize_comment(generated_at).as_str()),
            ("__JOB_ID__", sanitize_comment(job_id).as_str()),
            ("__BASE_URL__", base_url_literal.as_str()),
            ("__PAGE_SCHEMAS__", pages_literal.as_str()),
            ("__PAGE_INDEX__", index_literal.as_str()),
        ],
    ))
}

/// Replaces placeholders in one pass; inserted text is never rescanned
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find("__") {
        for (name, value) in values {
            if rest[start..].starts_with(name) {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &rest[start + name.len()..];
                continue 'scan;
            }
        }
        out.push_str(&rest[..start + 2]);
        rest = &rest[start + 2..];
    }

    out.push_str(rest);
    out
}

fn sanitize_comment(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Collapses whitespace runs outside string literals to one space
///
/// Single-quoted, double-quoted and template literals are copied verbatim,
/// including escape sequences. The result is trimmed.
pub fn minify_script(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for c in script.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;

        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
        }
        out.push(c);
    }

    out
}
