//! Configuration module for Getter
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use getter::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("getter.toml")).unwrap();
//! println!("Chain has {} steps", config.steps.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, StepDescriptor};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
