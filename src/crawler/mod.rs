//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier (FIFO queue, dedup, admission policy, page budget)
//! - Rendering with retry logic
//! - Content and link extraction
//! - Overall crawl orchestration for one job

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod page;
mod render;

pub use coordinator::Orchestrator;
pub use extractor::extract;
pub use fetcher::{Fetcher, RenderError, Renderer};
pub use frontier::Frontier;
pub use page::{take_chars, truncate_with_marker, Metadata, PageRecord, DEGRADED_TITLE};
pub use render::HttpRenderer;
