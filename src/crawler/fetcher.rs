//! Page fetcher with retry logic
//!
//! This module wraps a [`Renderer`] with:
//! - A bounded number of attempts per URL
//! - A per-attempt timeout covering navigation and content settling
//! - Linear backoff between attempts
//! - Round-robin proxy selection
//!
//! Exhausting every attempt is a soft failure: [`Fetcher::fetch`] returns an
//! empty string and the caller records the error.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors a renderer may report for a single navigation
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Navigation timeout for {url}")]
    Timeout { url: String },

    #[error("Rendering session error: {0}")]
    Session(String),
}

/// Capability that turns a URL into rendered markup
///
/// Each call is expected to use an isolated session (fresh cookies and
/// connections) that is released before returning.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigates to `url`, waits for the page to settle and returns its markup
    async fn render(
        &self,
        url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RenderError>;
}

/// Why a single fetch attempt did not produce usable markup
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("attempt exceeded {0:?}")]
    TimedOut(Duration),

    #[error("markup too short ({0} characters)")]
    TooShort(usize),
}

/// Fetches pages through a renderer with retries and backoff
pub struct Fetcher {
    renderer: Arc<dyn Renderer>,
    config: FetcherConfig,
    proxy_cursor: AtomicUsize,
}

impl Fetcher {
    /// Creates a fetcher around the given renderer
    pub fn new(renderer: Arc<dyn Renderer>, config: FetcherConfig) -> Self {
        Self {
            renderer,
            config,
            proxy_cursor: AtomicUsize::new(0),
        }
    }

    /// Picks the next proxy from the configured list, round-robin
    ///
    /// Returns `None` when no proxies are configured.
    pub fn next_proxy(&self) -> Option<String> {
        if self.config.proxies.is_empty() {
            return None;
        }

        let index = self.proxy_cursor.fetch_add(1, Ordering::Relaxed) % self.config.proxies.len();
        Some(self.config.proxies[index].clone())
    }

    /// Fetches a URL, retrying failed attempts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Renderer error | Retry |
    /// | Attempt exceeds navigation timeout + settle delay | Retry |
    /// | Markup shorter than `min-content-length` | Retry |
    ///
    /// Attempt `n` (1-based) that fails is followed by a sleep of
    /// `backoff × n`; the final attempt is not followed by a sleep.
    ///
    /// # Returns
    ///
    /// The rendered markup, or an empty string once every attempt has failed
    pub async fn fetch(&self, url: &str, proxy: Option<&str>) -> String {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(url, proxy).await {
                Ok(markup) => return markup,
                Err(failure) => {
                    tracing::warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt,
                        max_attempts,
                        url,
                        failure
                    );
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.backoff() * attempt).await;
            }
        }

        tracing::error!("All attempts failed for {}", url);
        String::new()
    }

    /// Performs a single bounded attempt
    async fn attempt(&self, url: &str, proxy: Option<&str>) -> Result<String, AttemptFailure> {
        let navigation_timeout = self.navigation_timeout();
        let attempt_budget = navigation_timeout + self.settle_delay();

        let markup = tokio::time::timeout(
            attempt_budget,
            self.renderer.render(url, proxy, navigation_timeout),
        )
        .await
        .map_err(|_| AttemptFailure::TimedOut(attempt_budget))??;

        let length = markup.chars().count();
        if length < self.config.min_content_length {
            return Err(AttemptFailure::TooShort(length));
        }

        Ok(markup)
    }

    fn backoff(&self) -> Duration {
        Duration::from_millis(self.config.backoff_ms)
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.navigation_timeout_ms)
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.config.settle_delay_ms)
    }
}
