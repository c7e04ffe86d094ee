//! README generation
//!
//! This module generates the human-readable `README.md` placed in every
//! artifact tree, covering integration steps and the list of page documents.

use super::documents::{script_tag, PageEntry};

/// Everything the README describes
#[derive(Debug, Clone, Copy)]
pub struct ReadmeContext<'a> {
    pub domain: &'a str,
    pub job_id: &'a str,
    pub publish_url: &'a str,
    pub generated_at: &'a str,
    pub pages: &'a [PageEntry],
}

/// Formats the README as markdown
pub fn format_readme(ctx: &ReadmeContext<'_>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# JSON-LD Schema Files for {}\n\n", ctx.domain));
    md.push_str(&format!(
        "This directory contains schema.org JSON-LD documents for {} pages of {}.\n\n",
        ctx.pages.len(),
        ctx.domain
    ));

    md.push_str("## Integration\n\n");
    md.push_str("### Published Loader\n\n");
    md.push_str("Add the following script tag to the `<head>` of your website:\n\n");
    md.push_str("```html\n");
    md.push_str(&script_tag(ctx.publish_url));
    md.push_str("\n```\n\n");
    md.push_str(
        "The loader picks the document for the current page, injects its JSON-LD and \
         dispatches a `schemaLoaded` event.\n\n",
    );

    md.push_str("### Self-Hosted\n\n");
    md.push_str("1. Copy every file in this directory to your server\n");
    md.push_str("2. Edit `SCHEMA_BASE_URL` in `schema-loader.js` to point at that location\n");
    md.push_str("3. Include `schema-loader.js` (or `schema-loader.min.js`) in your pages\n\n");

    md.push_str("## Files\n\n");
    md.push_str("- `schema-loader.js`: Loader script\n");
    md.push_str("- `schema-loader.min.js`: Minified loader script\n");
    md.push_str("- `index.json`: Index of all page documents\n");
    md.push_str("- One JSON document per crawled page\n\n");

    if !ctx.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| File | URL | Title |\n");
        md.push_str("|------|-----|-------|\n");
        for page in ctx.pages {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&page.filename),
                escape_cell(&page.url),
                escape_cell(&page.title)
            ));
        }
        md.push('\n');
    }

    md.push_str("## Generation\n\n");
    md.push_str(&format!("- **Job ID**: {}\n", ctx.job_id));
    md.push_str(&format!("- **Generated**: {}\n", ctx.generated_at));

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
