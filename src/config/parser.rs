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
/// use contact_scout::config::load_config;
///
/// let config = load_config(Path::new("contact-scout.toml")).unwrap();
/// println!("Max count: {}", config.batch.max_count);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// Missing sections and keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be tied to the exact settings they used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
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
max-external-links = 5

[timeouts]
main-page = 12000
canonical = 4000

[batch]
concurrency-limit = 3
delay-ms = 250
max-count = 7

[resolver]
platform-host = "listings.test"
wrapper-patterns = ["listings.test/r/"]

[monitor]
page-size = 20
seen-capacity = 100
seen-retain = 40

[output]
database-path = "./test.db"

[notifier]
webhook-url = "https://hooks.example.org/abc"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_external_links, 5);
        assert_eq!(config.timeouts.main_page, 12_000);
        assert_eq!(config.timeouts.canonical, 4_000);
        // Untouched keys keep their defaults
        assert_eq!(config.timeouts.secondary_page, 5_000);
        assert_eq!(config.batch.concurrency_limit, 3);
        assert_eq!(config.batch.max_count, 7);
        assert_eq!(config.resolver.platform_host, "listings.test");
        assert_eq!(config.monitor.seen_retain, 40);
        assert_eq!(
            config.notifier.webhook_url.as_deref(),
            Some("https://hooks.example.org/abc")
        );
        assert!(!config.filters.bypass_domains.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.batch.concurrency_limit, 5);
        assert_eq!(config.timeouts.main_page, 15_000);
        assert_eq!(config.monitor.seen_capacity, 1_000);
        assert_eq!(config.crawler.user_agents.len(), 3);
        assert!(config.notifier.webhook_url.is_none());
    }

    #[test]
    fn test_filter_lists_override() {
        let config = parse_config(
            r#"
[filters]
placeholder-usernames = ["nobody"]
bypass-domains = ["corp.example"]
"#,
        )
        .unwrap();

        assert_eq!(config.filters.placeholder_usernames, vec!["nobody"]);
        assert_eq!(config.filters.bypass_domains, vec!["corp.example"]);
        // Lists that were not mentioned keep the built-in defaults
        assert!(config.filters.likely_real_tlds.contains(&".io".to_string()));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[batch]
concurrency-limit = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
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
