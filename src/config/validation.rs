use crate::config::types::{
    BatchConfig, Config, CrawlerConfig, FilterConfig, MonitorConfig, NotifierConfig,
    OutputConfig, ResolverConfig, TimeoutConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_timeout_config(&config.timeouts)?;
    validate_batch_config(&config.batch)?;
    validate_filter_config(&config.filters)?;
    validate_resolver_config(&config.resolver)?;
    validate_monitor_config(&config.monitor)?;
    validate_output_config(&config.output)?;
    validate_notifier_config(&config.notifier)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents must contain at least one entry".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain empty strings".to_string(),
        ));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    if config.json_depth_limit < 1 {
        return Err(ConfigError::Validation(
            "json_depth_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout_config(config: &TimeoutConfig) -> Result<(), ConfigError> {
    let budgets = [
        ("redirect-probe", config.redirect_probe),
        ("wrapper-page", config.wrapper_page),
        ("canonical", config.canonical),
        ("main-page", config.main_page),
        ("secondary-page", config.secondary_page),
        ("body-read", config.body_read),
        ("parse-phase", config.parse_phase),
    ];

    for (name, value) in budgets {
        if value < 50 {
            return Err(ConfigError::Validation(format!(
                "timeout '{}' must be >= 50ms, got {}ms",
                name, value
            )));
        }
    }

    Ok(())
}

fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.concurrency_limit < 1 || config.concurrency_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and 100, got {}",
            config.concurrency_limit
        )));
    }

    Ok(())
}

fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for domain in &config.bypass_domains {
        validate_domain_string(domain)?;
    }

    for tld in &config.likely_real_tlds {
        if !tld.starts_with('.') || tld.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "likely_real_tlds entries must look like '.com', got '{}'",
                tld
            )));
        }
    }

    if config.placeholder_domains.iter().any(|d| d.is_empty())
        || config.placeholder_usernames.iter().any(|u| u.is_empty())
    {
        // An empty entry would match every address
        return Err(ConfigError::Validation(
            "placeholder lists cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    validate_domain_string(&config.platform_host)?;

    if config.wrapper_patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "wrapper_patterns cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1".to_string(),
        ));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "max_retries must be >= 1".to_string(),
        ));
    }

    if config.seen_retain > config.seen_capacity {
        return Err(ConfigError::Validation(format!(
            "seen_retain ({}) cannot exceed seen_capacity ({})",
            config.seen_retain, config.seen_capacity
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_notifier_config(config: &NotifierConfig) -> Result<(), ConfigError> {
    if let Some(webhook) = &config.webhook_url {
        let url = Url::parse(webhook)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webhook_url: {}", e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::InvalidUrl(format!(
                "webhook_url must use http or https, got '{}'",
                webhook
            )));
        }
    }

    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "notifier timeout must be >= 100ms, got {}ms",
            config.timeout_ms
        )));
    }

    Ok(())
}

/// Validates a bare host name such as `example.com`
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
