//! Configuration module for Contact-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use contact_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("contact-scout.toml")).unwrap();
//! println!("Concurrency limit: {}", config.batch.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, Config, CrawlerConfig, FilterConfig, MonitorConfig, NotifierConfig, OutputConfig,
    ResolverConfig, TimeoutConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
