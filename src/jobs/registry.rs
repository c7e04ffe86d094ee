//! Process-wide job registry
//!
//! Each job's owning task publishes whole snapshots through a
//! `tokio::sync::watch` channel. The registry keeps the receiving half, so a
//! reader always sees the latest complete snapshot and never blocks the
//! writer.

use super::job::{Job, PageSummary};
use crate::state::JobStatus;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Writing half of a job's snapshot channel
///
/// Held by the orchestrator task that owns the job.
#[derive(Debug)]
pub struct JobPublisher {
    sender: watch::Sender<Job>,
}

impl JobPublisher {
    /// Replaces the published snapshot
    ///
    /// Succeeds even when the job has been deleted from the registry.
    pub fn publish(&self, job: &Job) {
        self.sender.send_replace(job.clone());
    }

    /// Returns the most recently published snapshot
    pub fn latest(&self) -> Job {
        self.sender.borrow().clone()
    }
}

/// One row of the job listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOverview {
    pub id: String,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub progress: usize,
    pub total_pages: usize,
}

impl From<&Job> for JobOverview {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            status: job.status,
            started_at: job.started_at,
            progress: job.progress,
            total_pages: job.total_pages,
        }
    }
}

/// Map from job id to the latest published snapshot
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<String, watch::Receiver<Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new job and returns the publisher for its snapshots
    pub fn insert(&self, job: Job) -> JobPublisher {
        let id = job.id.clone();
        let (sender, receiver) = watch::channel(job);
        self.jobs.insert(id, receiver);
        JobPublisher { sender }
    }

    /// Returns the latest snapshot of a job
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.get(id).map(|receiver| receiver.borrow().clone())
    }

    /// Returns a receiver that observes every later snapshot of a job
    pub fn subscribe(&self, id: &str) -> Option<watch::Receiver<Job>> {
        self.jobs.get(id).map(|receiver| receiver.clone())
    }

    /// Removes a job, returning its last snapshot
    ///
    /// The owning task keeps running; its later snapshots go nowhere.
    pub fn remove(&self, id: &str) -> Option<Job> {
        self.jobs
            .remove(id)
            .map(|(_, receiver)| receiver.borrow().clone())
    }

    /// Lists every job, oldest first
    pub fn list(&self) -> Vec<JobOverview> {
        let mut overviews: Vec<JobOverview> = self
            .jobs
            .iter()
            .map(|entry| JobOverview::from(&*entry.value().borrow()))
            .collect();
        overviews.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
        overviews
    }

    /// Returns the completed-page summary at `index` of a job
    pub fn page(&self, id: &str, index: usize) -> Option<PageSummary> {
        self.jobs
            .get(id)
            .and_then(|receiver| receiver.borrow().completed_pages.get(index).cloned())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
