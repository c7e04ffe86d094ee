//! Crawl orchestrator - main crawl loop for one job
//!
//! This module drives a job through its lifecycle:
//! - Draining the frontier through the fetcher and extractor
//! - Publishing a job snapshot after every step
//! - Generating a schema document for every crawled page
//! - Packaging the results and recording where they went

use crate::config::Config;
use crate::crawler::{extract, Fetcher, Frontier, PageRecord, Renderer};
use crate::jobs::{ArtifactSummary, Job, JobPublisher, OutputLocations, PageSummary};
use crate::output::{PackageLocations, Packager, SchemaPage};
use crate::schema::{Inference, SchemaGenerator};
use crate::state::JobStatus;
use crate::url::{normalize_url, scope_of};
use crate::{CrawlerError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Runs crawl jobs end to end
///
/// One orchestrator may run many jobs concurrently; all per-job state lives
/// in the job's own task.
pub struct Orchestrator {
    fetcher: Fetcher,
    generator: SchemaGenerator,
    packager: Arc<Packager>,
    rate_limit_delay: Duration,
}

impl Orchestrator {
    /// Creates an orchestrator from configuration and injected capabilities
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>, inference: Arc<dyn Inference>) -> Self {
        Self::from_parts(
            Fetcher::new(renderer, config.fetcher.clone()),
            SchemaGenerator::new(inference, Duration::from_secs(config.inference.timeout_secs)),
            Packager::from_config(&config.output),
            Duration::from_millis(config.crawler.rate_limit_delay_ms),
        )
    }

    /// Creates an orchestrator from already-built components
    pub fn from_parts(
        fetcher: Fetcher,
        generator: SchemaGenerator,
        packager: Packager,
        rate_limit_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            generator,
            packager: Arc::new(packager),
            rate_limit_delay,
        }
    }

    /// Runs a job to a terminal state
    ///
    /// # State Machine
    ///
    /// ```text
    /// Initializing -> Crawling -> Completed
    ///                          -> Failed
    /// ```
    ///
    /// Every state change is published. Faults in fetching, extraction and
    /// schema generation are recorded and the job carries on; a packaging
    /// fault or any other unexpected fault fails the job. A panic anywhere in
    /// the job also fails it, starting from the last published snapshot.
    ///
    /// # Returns
    ///
    /// The final job snapshot
    pub async fn run(&self, job: Job, publisher: JobPublisher) -> Job {
        let id = job.id.clone();

        match AssertUnwindSafe(self.execute(job, &publisher))
            .catch_unwind()
            .await
        {
            Ok(job) => job,
            Err(panic_info) => {
                let message = format!(
                    "Critical error in crawl job {}: task panicked: {}",
                    id,
                    panic_message(&*panic_info)
                );
                tracing::error!("{}", message);

                let mut job = publisher.latest();
                if let Err(e) = job.fail(message) {
                    tracing::error!("Job {} could not reach a terminal state: {}", id, e);
                }
                publisher.publish(&job);
                job
            }
        }
    }

    async fn execute(&self, mut job: Job, publisher: &JobPublisher) -> Job {
        tracing::info!(
            "Starting crawl for job {} with URL: {}",
            job.id,
            job.config.start_url
        );

        let outcome = match job.transition(JobStatus::Crawling) {
            Ok(()) => {
                publisher.publish(&job);
                self.crawl(&mut job, publisher).await
            }
            Err(e) => Err(e),
        };

        let finished = match outcome {
            Ok((domain, locations)) => {
                let artifacts = ArtifactSummary::new(&domain, &locations, job.errors.len());
                job.complete(OutputLocations::from(&locations), artifacts)
                    .map(|()| {
                        tracing::info!(
                            "Crawl completed for job {}. Processed {} pages with {} errors",
                            job.id,
                            job.completed_pages.len(),
                            job.errors.len()
                        );
                    })
            }
            Err(e) => {
                let message = format!("Critical error in crawl job {}: {}", job.id, e);
                tracing::error!("{}", message);
                job.fail(message)
            }
        };

        if let Err(e) = finished {
            tracing::error!("Job {} could not reach a terminal state: {}", job.id, e);
        }

        publisher.publish(&job);
        job
    }

    /// Crawls, generates schemas and packages
    ///
    /// Returns the scope domain and the package locations.
    async fn crawl(
        &self,
        job: &mut Job,
        publisher: &JobPublisher,
    ) -> Result<(String, PackageLocations)> {
        let domain = scope_of(&job.config.start_url)?;
        let records = self.drain_frontier(job, publisher, &domain).await;

        let mut pages = Vec::with_capacity(records.len());
        for record in records {
            let (schema, fault) = self.generator.generate_reporting(&record).await;
            if let Some(e) = fault {
                job.record_error(format!("Error generating JSON-LD for {}: {}", record.url, e));
                publisher.publish(job);
            }
            pages.push(SchemaPage { record, schema });
        }

        tracing::info!(
            "Creating individual JSON files for {} pages",
            pages.len()
        );

        let packager = Arc::clone(&self.packager);
        let job_id = job.id.clone();
        let package_domain = domain.clone();
        let locations = tokio::task::spawn_blocking(move || {
            packager.package(&job_id, &package_domain, &pages)
        })
        .await
        .map_err(|e| CrawlerError::Task(e.to_string()))??;

        Ok((domain, locations))
    }

    /// Visits pages until the frontier is empty or the budget is spent
    async fn drain_frontier(
        &self,
        job: &mut Job,
        publisher: &JobPublisher,
        domain: &str,
    ) -> Vec<PageRecord> {
        let mut frontier = Frontier::new(
            domain,
            job.config.allow_cross_domain,
            job.config.max_pages,
        );
        frontier.enqueue(&job.config.start_url);

        let mut records = Vec::new();

        while frontier.has_work() {
            let Some(next) = frontier.dequeue() else {
                break;
            };
            let url = normalize_url(&next);

            if frontier.is_visited(&url) || !frontier.is_admissible(&url) {
                continue;
            }

            job.set_current(&url, frontier.visited_count());
            publisher.publish(job);
            tracing::debug!("Crawling: {}", url);

            let proxy = self.fetcher.next_proxy();
            let markup = self.fetcher.fetch(&url, proxy.as_deref()).await;

            if markup.is_empty() {
                let message = format!("Failed to fetch content from {}", url);
                tracing::warn!("{}", message);
                job.record_error(message);
                publisher.publish(job);
                continue;
            }

            frontier.mark_visited(&url);
            let record = extract(&markup, &url);

            let queued = record
                .links
                .iter()
                .filter(|link| frontier.enqueue(link))
                .count();

            job.record_page(PageSummary::from_record(&record), frontier.visited_count());
            publisher.publish(job);
            tracing::info!(
                "Successfully processed {} - Found {} links ({} queued)",
                url,
                record.links.len(),
                queued
            );
            records.push(record);

            // No pause once the budget or queue is spent
            if frontier.has_work() && !self.rate_limit_delay.is_zero() {
                tokio::time::sleep(self.rate_limit_delay).await;
            }
        }

        records
    }
}

/// Extracts the message from a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
