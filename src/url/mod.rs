//! Locator handling for Chew
//!
//! This module decides whether a locator names a local file or a remote
//! resource, and provides the URL helpers (domain, origin, extension) used by
//! the politeness layer and the content-type resolver.

mod domain;
mod extension;

use std::path::PathBuf;

// Re-export main functions
pub use domain::{extract_domain, origin, parse_remote};
pub use extension::file_extension;

/// Prefix that marks a locator as a local file reference
pub const FILE_PREFIX: &str = "file://";

/// A classified input locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A local file; the `file://` prefix has been stripped
    LocalFile(PathBuf),
    /// Anything else, to be fetched over the network
    Remote(String),
}

impl Locator {
    /// Classifies a locator string
    ///
    /// Only the `file://` prefix selects the local path. Everything else is
    /// treated as remote and validated later, when it is parsed for fetching.
    ///
    /// # Examples
    ///
    /// ```
    /// use chew::url::Locator;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(
    ///     Locator::classify("file:///tmp/notes.md"),
    ///     Locator::LocalFile(PathBuf::from("/tmp/notes.md"))
    /// );
    /// assert_eq!(
    ///     Locator::classify("https://example.com/"),
    ///     Locator::Remote("https://example.com/".to_string())
    /// );
    /// ```
    pub fn classify(locator: &str) -> Self {
        match locator.strip_prefix(FILE_PREFIX) {
            Some(path) => Self::LocalFile(PathBuf::from(path)),
            None => Self::Remote(locator.to_string()),
        }
    }
}
