//! State module for tracking crawl job lifecycle
//!
//! # Components
//!
//! - `JobStatus`: Tracks where a crawl job is in its lifecycle
//!   (initializing, crawling, completed, failed) and which transitions are legal

mod job_status;

// Re-export main types
pub use job_status::JobStatus;
