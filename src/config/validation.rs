use crate::config::types::{AuthConfig, Config, CrawlConfig, OutputConfig, RenderConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    if let Some(auth) = &config.auth {
        validate_auth_config(auth)?;
    }
    validate_render_config(&config.render)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout_seconds must be >= 1".to_string(),
        ));
    }

    if let Some(pattern) = &config.url_pattern {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates login credentials
fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    Url::parse(&config.login_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid login_url: {}", e)))?;

    if config.username.is_empty() || config.password.is_empty() {
        return Err(ConfigError::Validation(
            "username and password are both required for login".to_string(),
        ));
    }

    Ok(())
}

/// Validates renderer options
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.wkhtmltopdf_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "wkhtmltopdf_path cannot be empty".to_string(),
        ));
    }

    if config.page_size.trim().is_empty() || config.margin.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page_size and margin cannot be empty".to_string(),
        ));
    }

    if config.encoding.trim().is_empty() {
        return Err(ConfigError::Validation(
            "encoding cannot be empty".to_string(),
        ));
    }

    Ok(())
}
