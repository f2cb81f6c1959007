//! Configuration module for Chew
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing sections fall back to their defaults.
//!
//! # Example
//!
//! ```no_run
//! use chew::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("chew.toml")).unwrap();
//! println!("Retry limit: {}", config.retry.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, PolitenessConfig, RateLimitConfig, RetryConfig, TransportConfig, DEFAULT_USER_AGENT,
};

pub use parser::{load_config, parse_config};
pub use validation::validate;
