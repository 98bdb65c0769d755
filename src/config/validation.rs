use crate::config::types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, RetryConfig, SiteConfig, TranslationConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_retry_config(&config.retry)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_translation_config(&config.translation)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.site_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "site-url '{}' must use http or https",
            config.site_url
        )));
    }

    if !config.listing_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing-path must start with '/', got '{}'",
            config.listing_path
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.delay_min_ms > config.delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "delay-min-ms ({}) must not exceed delay-max-ms ({})",
            config.delay_min_ms, config.delay_max_ms
        )));
    }

    if config.backoff_factor == 0 {
        return Err(ConfigError::Validation(
            "backoff-factor must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.detail_workers < 1 || config.detail_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "detail-workers must be between 1 and 64, got {}",
            config.detail_workers
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (key, value) in [
        ("directory", &config.directory),
        ("file-name", &config.file_name),
        ("translated-file-name", &config.translated_file_name),
        ("log-file-name", &config.log_file_name),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    if config.file_name == config.translated_file_name {
        return Err(ConfigError::Validation(
            "file-name and translated-file-name must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_translation_config(config: &TranslationConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid translation endpoint: {}", e)))?;

    if config.target_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target-language cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "translation timeout-ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
