//! Crawl job service
//!
//! The request-handling surface of the crate: submit a crawl, query its
//! status, list jobs, look up a crawled page and delete a job.

use super::job::{CrawlRequest, Job, PageSummary};
use super::registry::{JobOverview, JobRegistry};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::{HttpRenderer, Orchestrator};
use crate::schema::build_inference;
use crate::{CrawlerError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A job that has been accepted and started
#[derive(Debug)]
pub struct SubmittedJob {
    pub id: String,

    /// Resolves to the final job snapshot
    pub handle: JoinHandle<Job>,
}

/// Details of one crawled page of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDetail {
    pub page_info: PageSummary,
    pub job_id: String,
    pub page_index: usize,
}

/// Entry point for running and inspecting crawl jobs
pub struct CrawlService {
    registry: Arc<JobRegistry>,
    orchestrator: Arc<Orchestrator>,
    crawler_config: CrawlerConfig,
}

impl CrawlService {
    /// Creates a service around an orchestrator
    pub fn new(config: &Config, orchestrator: Orchestrator) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            orchestrator: Arc::new(orchestrator),
            crawler_config: config.crawler.clone(),
        }
    }

    /// Creates a service with the HTTP renderer and configured inference
    pub fn from_config(config: &Config) -> Result<Self> {
        let renderer = Arc::new(HttpRenderer::new(
            config.fetcher.user_agent.clone(),
            Duration::from_millis(config.fetcher.settle_delay_ms),
        ));
        let inference = build_inference(&config.inference)?;

        Ok(Self::new(config, Orchestrator::new(config, renderer, inference)))
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Validates a request, registers the job and starts its task
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, request: CrawlRequest) -> Result<SubmittedJob> {
        let job_config = request.validate(&self.crawler_config)?;
        let id = uuid::Uuid::new_v4().to_string();

        let job = Job::new(id.clone(), job_config);
        let publisher = self.registry.insert(job.clone());

        tracing::info!(
            "Accepted crawl job {} for {} (budget {})",
            id,
            job.config.start_url,
            job.total_pages
        );

        let orchestrator = Arc::clone(&self.orchestrator);
        let handle = tokio::spawn(async move { orchestrator.run(job, publisher).await });

        Ok(SubmittedJob { id, handle })
    }

    /// Returns the latest snapshot of a job
    pub fn status(&self, id: &str) -> Result<Job> {
        self.registry
            .get(id)
            .ok_or_else(|| CrawlerError::JobNotFound(id.to_string()))
    }

    /// Returns a receiver notified on every snapshot of a job
    pub fn subscribe(&self, id: &str) -> Result<watch::Receiver<Job>> {
        self.registry
            .subscribe(id)
            .ok_or_else(|| CrawlerError::JobNotFound(id.to_string()))
    }

    pub fn list(&self) -> Vec<JobOverview> {
        self.registry.list()
    }

    /// Returns the completed page at `index` of a job
    pub fn page(&self, id: &str, index: usize) -> Result<PageDetail> {
        if self.registry.get(id).is_none() {
            return Err(CrawlerError::JobNotFound(id.to_string()));
        }

        let page_info = self.registry.page(id, index).ok_or_else(|| {
            CrawlerError::InvalidRequest(format!("page {} not found in job {}", index, id))
        })?;

        Ok(PageDetail {
            page_info,
            job_id: id.to_string(),
            page_index: index,
        })
    }

    /// Removes a job from the registry
    ///
    /// A running job is not cancelled; its results are simply no longer
    /// reachable.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.registry
            .remove(id)
            .map(|_| tracing::info!("Deleted job {}", id))
            .ok_or_else(|| CrawlerError::JobNotFound(id.to_string()))
    }
}
