//! Output module for packaging crawl results into artifacts
//!
//! This module handles:
//! - Writing one JSON document per page plus the `index.json` manifest
//! - Generating the schema loader script and its minified twin
//! - Generating the README
//! - Delivering the finished tree to the configured output sinks

mod archive;
mod documents;
mod loader;
mod markdown;
mod naming;
mod publish;
mod traits;

pub use archive::ZipArchiveSink;
pub use documents::{
    script_tag, IndexManifest, PageDocument, PageEntry, PageInfo, UsageInstructions, WebsiteInfo,
    CONTENT_PREVIEW_CHARS,
};
pub use loader::{minify_script, render_loader_script, LoaderIndex};
pub use markdown::{format_readme, ReadmeContext};
pub use naming::{clean_domain, page_filename, FilenameAllocator, HOMEPAGE_FILENAME, INDEX_FILENAME};
pub use publish::{publish_url, PublishSink};
pub use traits::{ArtifactTree, OutputError, OutputResult, OutputSink, SinkLocation};

use crate::config::OutputConfig;
use crate::crawler::PageRecord;
use crate::schema::SchemaDocument;
use std::path::PathBuf;
use traits::write_file;

/// Filename of the loader script
pub const LOADER_FILENAME: &str = "schema-loader.js";

/// Filename of the minified loader script
pub const LOADER_MIN_FILENAME: &str = "schema-loader.min.js";

/// Filename of the README
pub const README_FILENAME: &str = "README.md";

/// A crawled page paired with its schema document
#[derive(Debug, Clone)]
pub struct SchemaPage {
    pub record: PageRecord,
    pub schema: SchemaDocument,
}

/// Where a packaged job's artifacts ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocations {
    /// Working tree under the storage directory
    pub tree_dir: PathBuf,

    /// Zip archive, when the archive sink ran
    pub archive_path: Option<PathBuf>,

    /// Publish copy, when the publish sink ran
    pub publish_dir: Option<PathBuf>,

    /// URL the publish copy is served at, when the publish sink ran
    pub publish_url: Option<String>,

    /// Pages listed in `index.json`, in crawl order
    pub pages: Vec<PageEntry>,

    /// Timestamp recorded in `index.json`
    pub crawl_date: String,
}

/// Builds the artifact tree for a job and hands it to the output sinks
pub struct Packager {
    storage_dir: PathBuf,
    publish_base_url: String,
    sinks: Vec<Box<dyn OutputSink>>,
}

impl Packager {
    /// Creates a packager with no sinks
    ///
    /// # Arguments
    ///
    /// * `storage_dir` - Directory that receives the working tree
    /// * `publish_base_url` - Base URL the loader script fetches documents from
    pub fn new(storage_dir: impl Into<PathBuf>, publish_base_url: impl Into<String>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            publish_base_url: publish_base_url.into(),
            sinks: Vec::new(),
        }
    }

    /// Adds an output sink; sinks run in the order they were added
    pub fn with_sink(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Creates a packager with the sinks selected in configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        let mut packager = Self::new(&config.storage_dir, &config.publish_base_url);

        if config.sinks.archives() {
            packager = packager.with_sink(Box::new(ZipArchiveSink::new(&config.storage_dir)));
        }
        if config.sinks.publishes() {
            packager = packager.with_sink(Box::new(PublishSink::new(
                &config.publish_dir,
                &config.publish_base_url,
            )));
        }

        packager
    }

    /// Returns the names of the configured sinks
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Packages a job's pages
    ///
    /// Writes `<storage_dir>/<clean_domain>_<job_id>/` containing one
    /// document per page, `index.json`, both loader scripts and `README.md`,
    /// then delivers the tree to every sink.
    ///
    /// # Returns
    ///
    /// * `Ok(PackageLocations)` - Every artifact was written and delivered
    /// * `Err(OutputError)` - Any write or sink failure; nothing is skipped
    pub fn package(
        &self,
        job_id: &str,
        domain: &str,
        pages: &[SchemaPage],
    ) -> OutputResult<PackageLocations> {
        let clean = clean_domain(domain);
        let tree = ArtifactTree {
            root: self.storage_dir.join(format!("{}_{}", clean, job_id)),
            clean_domain: clean.clone(),
            job_id: job_id.to_string(),
        };
        std::fs::create_dir_all(&tree.root)?;

        let base_url = publish_url(&self.publish_base_url, &clean);
        let crawl_date = chrono::Utc::now().to_rfc3339();

        let entries = self.write_page_documents(&tree, pages, &crawl_date)?;

        let manifest = IndexManifest {
            website: WebsiteInfo {
                domain: domain.to_string(),
                crawl_date: crawl_date.clone(),
                total_pages: entries.len(),
                job_id: job_id.to_string(),
            },
            pages: entries.clone(),
            usage_instructions: UsageInstructions::for_publish_url(&base_url),
        };
        write_file(
            &tree.root.join(INDEX_FILENAME),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        let script = render_loader_script(&clean, job_id, &base_url, &entries, &crawl_date)?;
        write_file(&tree.root.join(LOADER_MIN_FILENAME), minify_script(&script))?;
        write_file(&tree.root.join(LOADER_FILENAME), script)?;

        let readme = format_readme(&ReadmeContext {
            domain,
            job_id,
            publish_url: &base_url,
            generated_at: &crawl_date,
            pages: &entries,
        });
        write_file(&tree.root.join(README_FILENAME), readme)?;

        let mut locations = PackageLocations {
            tree_dir: tree.root.clone(),
            archive_path: None,
            publish_dir: None,
            publish_url: None,
            pages: entries,
            crawl_date,
        };

        for sink in &self.sinks {
            match sink.deliver(&tree)? {
                SinkLocation::Archive(path) => locations.archive_path = Some(path),
                SinkLocation::Published { dir, url } => {
                    locations.publish_dir = Some(dir);
                    locations.publish_url = Some(url);
                }
            }
        }

        tracing::info!(
            "Packaged {} pages for {} into {}",
            locations.pages.len(),
            domain,
            tree.root.display()
        );

        Ok(locations)
    }

    fn write_page_documents(
        &self,
        tree: &ArtifactTree,
        pages: &[SchemaPage],
        crawled_at: &str,
    ) -> OutputResult<Vec<PageEntry>> {
        let mut allocator = FilenameAllocator::new();
        let mut entries = Vec::with_capacity(pages.len());

        for page in pages {
            let filename = allocator.allocate(&page_filename(&page.record.url));
            let document = PageDocument::new(&page.record, &page.schema, crawled_at);
            write_file(
                &tree.root.join(&filename),
                serde_json::to_string_pretty(&document)?,
            )?;

            entries.push(PageEntry {
                filename,
                url: page.record.url.clone(),
                title: page.record.metadata.title.clone(),
            });
        }

        Ok(entries)
    }
}
