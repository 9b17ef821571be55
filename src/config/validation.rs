use crate::config::types::{Config, CrawlConfig, StepDescriptor};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_steps(&config.steps)?;
    Ok(())
}

/// Validates timeout and delay settings
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if config.delay_min > config.delay_max {
        return Err(ConfigError::Validation(format!(
            "delay-min ({}) must not exceed delay-max ({})",
            config.delay_min, config.delay_max
        )));
    }

    Ok(())
}

/// Validates the step chain
fn validate_steps(steps: &[StepDescriptor]) -> Result<(), ConfigError> {
    if steps.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[step]] is required".to_string(),
        ));
    }

    for (index, step) in steps.iter().enumerate() {
        validate_step_url(index + 1, &step.url)?;
    }

    Ok(())
}

fn validate_step_url(number: usize, url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::Validation(format!(
            "step {} has an empty url",
            number
        )));
    }

    let parsed = Url::parse(url).map_err(|e| {
        ConfigError::InvalidUrl(format!("step {} url '{}': {}", number, url, e))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "step {} url '{}' must use http or https",
            number, url
        )));
    }

    Ok(())
}
