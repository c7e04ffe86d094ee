use serde::Deserialize;

/// Main configuration structure for Schema-Crawler
///
/// Every section may be omitted from the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Page budget used when a request does not name one
    #[serde(rename = "default-max-pages", default = "default_max_pages")]
    pub default_max_pages: usize,

    /// Hard ceiling applied to every request's page budget
    #[serde(rename = "max-pages-ceiling", default = "default_max_pages_ceiling")]
    pub max_pages_ceiling: usize,

    /// Delay after each successfully visited page (milliseconds)
    #[serde(rename = "rate-limit-delay-ms", default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

/// Page rendering and retry behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Attempts per URL before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempts; multiplied by the attempt number (milliseconds)
    #[serde(rename = "backoff-ms", default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Navigation timeout for a single attempt (milliseconds)
    #[serde(rename = "navigation-timeout-ms", default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Time allowed for dynamic content to settle after navigation (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Markup shorter than this is treated as a failed attempt
    ///
    /// Counted in characters. Markup of exactly this length is accepted.
    #[serde(rename = "min-content-length", default = "default_min_content_length")]
    pub min_content_length: usize,

    /// User agent presented by the renderer
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy servers, used round-robin; empty means direct connections
    #[serde(default)]
    pub proxies: Vec<String>,
}

/// Schema inference service
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// When false every page gets the deterministic fallback document
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the Ollama-compatible inference server
    #[serde(default = "default_inference_endpoint")]
    pub endpoint: String,

    /// Model name passed to the inference server
    #[serde(default = "default_inference_model")]
    pub model: String,

    /// Timeout for one inference call (seconds)
    #[serde(rename = "timeout-secs", default = "default_inference_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(rename = "max-tokens", default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Artifact output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding per-job artifact trees and archives
    #[serde(rename = "storage-dir", default = "default_storage_dir")]
    pub storage_dir: String,

    /// Directory holding the publish-facing copy of each domain's tree
    #[serde(rename = "publish-dir", default = "default_publish_dir")]
    pub publish_dir: String,

    /// Public URL under which `publish-dir` is served
    #[serde(rename = "publish-base-url", default = "default_publish_base_url")]
    pub publish_base_url: String,

    /// Which output sinks receive the packaged tree
    #[serde(default)]
    pub sinks: SinkMode,
}

/// Selects the output sinks a packaged tree is delivered to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkMode {
    /// Zip archive only
    Archive,
    /// Publish directory only
    Publish,
    /// Zip archive and publish directory
    #[default]
    Both,
}

impl SinkMode {
    pub fn archives(&self) -> bool {
        matches!(self, Self::Archive | Self::Both)
    }

    pub fn publishes(&self) -> bool {
        matches!(self, Self::Publish | Self::Both)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_max_pages: default_max_pages(),
            max_pages_ceiling: default_max_pages_ceiling(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            min_content_length: default_min_content_length(),
            user_agent: default_user_agent(),
            proxies: Vec::new(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_inference_endpoint(),
            model: default_inference_model(),
            timeout_secs: default_inference_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            publish_dir: default_publish_dir(),
            publish_base_url: default_publish_base_url(),
            sinks: SinkMode::default(),
        }
    }
}

fn default_max_pages() -> usize {
    20
}

fn default_max_pages_ceiling() -> usize {
    50
}

fn default_rate_limit_delay_ms() -> u64 {
    1500
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_navigation_timeout_ms() -> u64 {
    20_000
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_min_content_length() -> usize {
    100
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/122.0.0.0 Safari/537.36"
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_inference_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_inference_model() -> String {
    "llama3.1".to_string()
}

fn default_inference_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_storage_dir() -> String {
    "crawler_data".to_string()
}

fn default_publish_dir() -> String {
    "cdn_files".to_string()
}

fn default_publish_base_url() -> String {
    "http://localhost:8000/cdn".to_string()
}
