use crate::config::types::{Config, CrawlerConfig, FetcherConfig, InferenceConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_inference_config(&config.inference)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_ceiling < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-ceiling must be >= 1, got {}",
            config.max_pages_ceiling
        )));
    }

    if config.default_max_pages < 1 || config.default_max_pages > config.max_pages_ceiling {
        return Err(ConfigError::Validation(format!(
            "default-max-pages must be between 1 and {}, got {}",
            config.max_pages_ceiling, config.default_max_pages
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.navigation_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= 100ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for proxy in &config.proxies {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates inference configuration
///
/// A disabled inference section is not checked further.
fn validate_inference_config(config: &InferenceConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    let endpoint = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid inference endpoint: {}", e))
    })?;
    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "inference endpoint must use http or https, got '{}'",
            config.endpoint
        )));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "inference model cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "inference timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.storage_dir.is_empty() {
        return Err(ConfigError::Validation(
            "storage-dir cannot be empty".to_string(),
        ));
    }

    if config.publish_dir.is_empty() {
        return Err(ConfigError::Validation(
            "publish-dir cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.publish_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid publish-base-url: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_default_budget_above_ceiling() {
        let mut config = Config::default();
        config.crawler.default_max_pages = 60;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_proxy() {
        let mut config = Config::default();
        config.fetcher.proxies = vec!["not a proxy".to_string()];
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_disabled_inference_skips_endpoint_check() {
        let mut config = Config::default();
        config.inference.enabled = false;
        config.inference.endpoint = "nonsense".to_string();
        assert!(validate(&config).is_ok());

        config.inference.enabled = true;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_publish_base_url_must_parse() {
        let mut config = Config::default();
        config.output.publish_base_url = "/relative/only".to_string();
        assert!(validate(&config).is_err());
    }
}
