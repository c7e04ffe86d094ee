use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use schema_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Default budget: {}", config.crawler.default_max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the configuration that
/// produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
default-max-pages = 10
max-pages-ceiling = 40
rate-limit-delay-ms = 500

[fetcher]
max-attempts = 2
backoff-ms = 250
proxies = ["http://proxy.local:3128"]

[inference]
enabled = false
model = "mistral"

[output]
storage-dir = "./data"
publish-dir = "./public"
publish-base-url = "https://cdn.example.com/schemas"
sinks = "archive"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.default_max_pages, 10);
        assert_eq!(config.crawler.max_pages_ceiling, 40);
        assert_eq!(config.fetcher.max_attempts, 2);
        assert_eq!(config.fetcher.proxies.len(), 1);
        assert_eq!(config.fetcher.min_content_length, 100);
        assert!(!config.inference.enabled);
        assert_eq!(config.inference.model, "mistral");
        assert_eq!(config.output.sinks, SinkMode::Archive);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.default_max_pages, 20);
        assert_eq!(config.crawler.max_pages_ceiling, 50);
        assert_eq!(config.crawler.rate_limit_delay_ms, 1500);
        assert_eq!(config.fetcher.max_attempts, 3);
        assert_eq!(config.fetcher.navigation_timeout_ms, 20_000);
        assert_eq!(config.output.sinks, SinkMode::Both);
        assert_eq!(config.output.publish_base_url, "http://localhost:8000/cdn");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawler.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[fetcher]
max-attempts = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_sink_mode_rejected() {
        let result = parse_config("[output]\nsinks = \"ftp\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
