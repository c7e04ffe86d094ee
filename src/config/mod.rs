//! Configuration module for Schema-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or `Config::default()`) is a
//! complete configuration.
//!
//! # Example
//!
//! ```no_run
//! use schema_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Rate limit delay: {}ms", config.crawler.rate_limit_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, InferenceConfig, OutputConfig, SinkMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
