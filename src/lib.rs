//! Schema-Crawler: a website crawler that ships schema.org documents
//!
//! This crate crawls a site from a seed URL, extracts metadata and content from
//! every page, synthesizes a JSON-LD schema document per page, and packages the
//! results into an archive and a publishable directory tree with a client-side
//! loader script.

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod output;
pub mod schema;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Schema-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Packaging error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Inference client error: {0}")]
    Inference(#[from] schema::InferenceError),

    #[error("Invalid crawl request: {0}")]
    InvalidRequest(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::JobStatus,
        to: state::JobStatus,
    },

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Schema-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract, Fetcher, Frontier, Metadata, Orchestrator, PageRecord, Renderer};
pub use jobs::{CrawlRequest, CrawlService, Job, JobRegistry};
pub use output::Packager;
pub use schema::{Inference, SchemaDocument, SchemaGenerator};
pub use state::JobStatus;
pub use url::{is_admissible, normalize_url};
