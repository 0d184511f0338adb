use crate::config::types::{ApiConfig, Config, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// The API never returns more than this many listings per page.
const MAX_PAGE_SIZE: u32 = 50;

/// Validates the entire configuration
///
/// Category and location lists may be empty at this point.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_output_config(&config.output)?;
    validate_entries("category", &config.search.categories)?;
    validate_entries("location", &config.search.locations)?;
    Ok(())
}

/// Validates that there is something to search for
///
/// Called once command-line overrides have been applied.
pub fn validate_targets(search: &SearchConfig) -> Result<(), ConfigError> {
    if search.categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category is required".to_string(),
        ));
    }

    if search.locations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one location is required".to_string(),
        ));
    }

    validate_entries("category", &search.categories)?;
    validate_entries("location", &search.locations)?;
    Ok(())
}

/// Validates search API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "key_env cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.max_offset < config.page_size {
        return Err(ConfigError::Validation(format!(
            "max_offset must be >= page_size ({}), got {}",
            config.page_size, config.max_offset
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Category aliases and locations become path components, so blank entries
/// and path separators are rejected.
fn validate_entries(kind: &str, entries: &[String]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be blank", kind)));
        }

        if entry.contains('/') || entry.contains('\\') || entry == ".." {
            return Err(ConfigError::Validation(format!(
                "{} '{}' cannot contain path separators",
                kind, entry
            )));
        }
    }

    Ok(())
}
