//! Chew: polite, concurrent content fetching
//!
//! This crate turns a list of locators (remote URLs or `file://` paths) into a
//! flat list of text [`Chunk`]s, respecting robots.txt, per-domain crawl delays,
//! a shared rate limit, retries and proxy rotation.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod robots;
pub mod state;
pub mod url;

use serde::Serialize;
use thiserror::Error;

/// One unit of extracted text tied to where it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chunk {
    /// Extracted text
    pub content: String,

    /// Source label (URL, URL with anchor, or file locator)
    pub source: String,
}

impl Chunk {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// Main error type for Chew operations
#[derive(Debug, Error)]
pub enum ChewError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Unsupported content type: {content_type:?}")]
    UnsupportedContentType { content_type: String },

    #[error("Access to {url} is disallowed by robots.txt")]
    RobotsDisallowed { url: String },

    #[error("Rate limit exceeded for {locator}: {reason}")]
    RateLimitExceeded { locator: String, reason: String },

    #[error("Crawl delay interrupted for {url}")]
    CrawlDelayInterrupted { url: String },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status_code} for {url}")]
    HttpStatus { url: String, status_code: u16 },

    #[error("Failed to read {path}: {source}")]
    LocalFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Extraction failed for {source_label}: {source}")]
    Extraction {
        source_label: String,
        source: extract::ExtractError,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl ChewError {
    /// Returns true if a fresh attempt at the same locator may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::HttpStatus { .. }
                | Self::LocalFile { .. }
                | Self::Extraction { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Chew operations
pub type Result<T> = std::result::Result<T, ChewError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CoordinatorBuilder};
pub use extract::{Extractor, ExtractorRegistry};
pub use tokio_util::sync::CancellationToken;
pub use crate::url::Locator;
