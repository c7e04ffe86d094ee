//! Crawl job records
//!
//! A [`Job`] is owned and mutated by exactly one orchestrator task. Everyone
//! else sees immutable snapshots published through the registry.

use crate::config::CrawlerConfig;
use crate::crawler::{truncate_with_marker, PageRecord};
use crate::output::{script_tag, PackageLocations};
use crate::state::JobStatus;
use crate::url::check_crawlable;
use crate::{CrawlerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title shown for pages without a `<title>`
pub const UNTITLED: &str = "Untitled";

/// A request to crawl one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// Seed URL
    pub url: String,

    /// Follow links to other hosts
    #[serde(default)]
    pub allow_cross_domain: bool,

    /// Page budget; the configured default when absent
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            allow_cross_domain: false,
            max_pages: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_cross_domain(mut self, allow: bool) -> Self {
        self.allow_cross_domain = allow;
        self
    }

    /// Validates the request and resolves its page budget
    ///
    /// A missing budget takes the configured default, a budget above the
    /// ceiling is clamped to it, and a zero budget is rejected. The seed URL
    /// must be crawlable.
    pub fn validate(&self, config: &CrawlerConfig) -> Result<JobConfig> {
        let url = self.url.trim();
        check_crawlable(url).map_err(|reason| {
            CrawlerError::InvalidRequest(format!("invalid seed URL {}: {}", url, reason))
        })?;

        let max_pages = match self.max_pages {
            None => config.default_max_pages,
            Some(0) => {
                return Err(CrawlerError::InvalidRequest(
                    "max_pages must be at least 1".to_string(),
                ))
            }
            Some(n) => n,
        }
        .min(config.max_pages_ceiling);

        Ok(JobConfig {
            start_url: url.to_string(),
            allow_cross_domain: self.allow_cross_domain,
            max_pages,
        })
    }
}

/// Validated configuration of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub start_url: String,
    pub allow_cross_domain: bool,
    pub max_pages: usize,
}

/// Short description of one crawled page, as shown in job status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub word_count: usize,
    pub description: String,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub status: String,
    pub timestamp: String,
    pub content_preview: String,
    pub internal_links_count: usize,
    pub external_links_count: usize,
}

impl PageSummary {
    pub fn from_record(record: &PageRecord) -> Self {
        let metadata = &record.metadata;
        let title = if metadata.title.is_empty() {
            UNTITLED.to_string()
        } else {
            metadata.title.clone()
        };

        Self {
            url: record.url.clone(),
            title,
            word_count: metadata.word_count,
            description: truncate_with_marker(&metadata.description, 200),
            h1_tags: metadata.h1_tags.iter().take(3).cloned().collect(),
            h2_tags: metadata.h2_tags.iter().take(5).cloned().collect(),
            status: "completed".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            content_preview: truncate_with_marker(&record.text_content, 500),
            internal_links_count: metadata.internal_links.len(),
            external_links_count: metadata.external_links.len(),
        }
    }
}

/// Where a completed job's artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLocations {
    pub tree_dir: String,
    pub archive_path: Option<String>,
    pub publish_dir: Option<String>,
    pub publish_url: Option<String>,
}

impl From<&PackageLocations> for OutputLocations {
    fn from(locations: &PackageLocations) -> Self {
        Self {
            tree_dir: locations.tree_dir.display().to_string(),
            archive_path: locations.archive_path.as_ref().map(|p| p.display().to_string()),
            publish_dir: locations.publish_dir.as_ref().map(|p| p.display().to_string()),
            publish_url: locations.publish_url.clone(),
        }
    }
}

/// Summary of a completed job's artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub website: String,
    pub crawl_date: String,
    pub total_pages: usize,
    pub error_count: usize,
    pub publish_url: Option<String>,
    pub archive_path: Option<String>,
    /// Script tag that loads the published loader, when published
    pub script_tag: Option<String>,
}

impl ArtifactSummary {
    pub fn new(website: &str, locations: &PackageLocations, error_count: usize) -> Self {
        Self {
            website: website.to_string(),
            crawl_date: locations.crawl_date.clone(),
            total_pages: locations.pages.len(),
            error_count,
            publish_url: locations.publish_url.clone(),
            archive_path: locations
                .archive_path
                .as_ref()
                .map(|p| p.display().to_string()),
            script_tag: locations.publish_url.as_deref().map(script_tag),
        }
    }
}

/// Snapshot of one crawl job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,

    /// Number of pages visited so far
    pub progress: usize,

    /// Page budget
    pub total_pages: usize,

    pub current_url: Option<String>,

    /// Append-only, in crawl order
    pub completed_pages: Vec<PageSummary>,

    /// Append-only
    pub errors: Vec<String>,

    pub config: JobConfig,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outputs: Option<OutputLocations>,
    pub artifacts: Option<ArtifactSummary>,
}

impl Job {
    /// Creates a job in the `Initializing` state
    pub fn new(id: impl Into<String>, config: JobConfig) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Initializing,
            progress: 0,
            total_pages: config.max_pages,
            current_url: None,
            completed_pages: Vec::new(),
            errors: Vec::new(),
            config,
            started_at: now,
            updated_at: now,
            finished_at: None,
            outputs: None,
            artifacts: None,
        }
    }

    /// Moves the job to `next`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Transition applied
    /// * `Err(CrawlerError::InvalidTransition)` - Transition not allowed; the
    ///   job is unchanged
    pub fn transition(&mut self, next: JobStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.touch();
        if next.is_terminal() {
            self.finished_at = Some(self.updated_at);
        }
        Ok(())
    }

    /// Records the URL being fetched
    pub fn set_current(&mut self, url: &str, progress: usize) {
        self.current_url = Some(url.to_string());
        self.set_progress(progress);
        self.touch();
    }

    /// Appends an error message
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.touch();
    }

    /// Appends a completed page
    pub fn record_page(&mut self, summary: PageSummary, progress: usize) {
        self.completed_pages.push(summary);
        self.set_progress(progress);
        self.touch();
    }

    /// Marks the job `Completed` with its artifact locations
    pub fn complete(&mut self, outputs: OutputLocations, artifacts: ArtifactSummary) -> Result<()> {
        self.transition(JobStatus::Completed)?;
        self.outputs = Some(outputs);
        self.artifacts = Some(artifacts);
        Ok(())
    }

    /// Marks the job `Failed`, keeping earlier errors and appending `message`
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.transition(JobStatus::Failed)?;
        self.errors.push(message.into());
        Ok(())
    }

    fn set_progress(&mut self, progress: usize) {
        self.progress = progress.min(self.total_pages);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Metadata;

    fn config() -> CrawlerConfig {
        CrawlerConfig::default()
    }

    fn job() -> Job {
        let job_config = CrawlRequest::new("https://example.com/")
            .validate(&config())
            .unwrap();
        Job::new("job-1", job_config)
    }

    #[test]
    fn test_request_default_budget() {
        let job_config = CrawlRequest::new("https://example.com").validate(&config()).unwrap();
        assert_eq!(job_config.max_pages, 20);
        assert!(!job_config.allow_cross_domain);
    }

    #[test]
    fn test_request_budget_clamped() {
        let job_config = CrawlRequest::new("https://example.com")
            .with_max_pages(500)
            .validate(&config())
            .unwrap();
        assert_eq!(job_config.max_pages, 50);
    }

    #[test]
    fn test_request_zero_budget_rejected() {
        let err = CrawlRequest::new("https://example.com")
            .with_max_pages(0)
            .validate(&config())
            .unwrap_err();
        assert!(matches!(err, CrawlerError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_bad_seed_rejected() {
        for url in ["not a url", "ftp://example.com/", "https://facebook.com/acme", "https://example.com/a.pdf"] {
            let err = CrawlRequest::new(url).validate(&config()).unwrap_err();
            assert!(matches!(err, CrawlerError::InvalidRequest(_)), "{url}");
        }
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: CrawlRequest = serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(request, CrawlRequest::new("https://example.com"));
    }

    #[test]
    fn test_lifecycle() {
        let mut job = job();
        assert_eq!(job.status, JobStatus::Initializing);
        assert!(job.finished_at.is_none());

        job.transition(JobStatus::Crawling).unwrap();
        job.record_error("Failed to fetch content from https://example.com/x");
        job.fail("Critical error in crawl job job-1: boom").unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.errors.len(), 2);
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = job();
        job.transition(JobStatus::Crawling).unwrap();
        job.fail("boom").unwrap();

        let err = job.transition(JobStatus::Crawling).unwrap_err();
        assert!(matches!(err, CrawlerError::InvalidTransition { .. }));
        assert!(job.fail("again").is_err());
        assert_eq!(job.errors, vec!["boom"]);
    }

    #[test]
    fn test_progress_never_exceeds_budget() {
        let mut job = job();
        job.set_current("https://example.com/", 99);
        assert_eq!(job.progress, job.total_pages);
    }

    #[test]
    fn test_page_summary_truncation() {
        let record = PageRecord {
            url: "https://example.com/".to_string(),
            metadata: Metadata {
                description: "d".repeat(250),
                h1_tags: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                h2_tags: (0..7).map(|i| i.to_string()).collect(),
                ..Metadata::default()
            },
            markdown: String::new(),
            html: String::new(),
            text_content: "t".repeat(600),
            links: Vec::new(),
        };

        let summary = PageSummary::from_record(&record);
        assert_eq!(summary.title, UNTITLED);
        assert_eq!(summary.description.len(), 203);
        assert!(summary.description.ends_with("..."));
        assert_eq!(summary.h1_tags.len(), 3);
        assert_eq!(summary.h2_tags.len(), 5);
        assert_eq!(summary.content_preview.len(), 503);
        assert_eq!(summary.status, "completed");
    }

    #[test]
    fn test_job_serializes_status_lowercase() {
        let value = serde_json::to_value(job()).unwrap();
        assert_eq!(value["status"], "initializing");
        assert_eq!(value["total_pages"], 20);
    }
}
