//! Jobs module for submitting and tracking crawl jobs
//!
//! # Components
//!
//! - `CrawlRequest`: A submission, validated into a `JobConfig`
//! - `Job`: Snapshot of one job's lifecycle, progress, errors and outputs
//! - `JobRegistry`: Job id to latest snapshot, fed by a `JobPublisher`
//! - `CrawlService`: Submit, status, list, page detail, delete

mod job;
mod registry;
mod service;

pub use job::{
    ArtifactSummary, CrawlRequest, Job, JobConfig, OutputLocations, PageSummary, UNTITLED,
};
pub use registry::{JobOverview, JobPublisher, JobRegistry};
pub use service::{CrawlService, PageDetail, SubmittedJob};
