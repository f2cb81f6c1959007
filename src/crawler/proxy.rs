//! Round-robin proxy rotation

use crate::ConfigError;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Ordered proxy list with a shared cursor
///
/// Each call to [`next_proxy`](Self::next_proxy) hands out the proxy under
/// the cursor and advances it, wrapping at the end of the list.
#[derive(Debug, Default)]
pub struct ProxyRotation {
    proxies: Vec<Url>,
    index: Mutex<usize>,
}

impl ProxyRotation {
    pub fn new(proxies: Vec<Url>) -> Self {
        Self {
            proxies,
            index: Mutex::new(0),
        }
    }

    /// Parses the configured proxy URLs
    pub fn from_config(proxies: &[String]) -> Result<Self, ConfigError> {
        let parsed = proxies
            .iter()
            .map(|p| {
                Url::parse(p)
                    .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(parsed))
    }

    /// Returns the next proxy and its position, or None when the list is empty
    pub fn next_proxy(&self) -> Option<(usize, &Url)> {
        if self.proxies.is_empty() {
            return None;
        }

        let mut index = self.index.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *index;
        *index = (current + 1) % self.proxies.len();
        Some((current, &self.proxies[current]))
    }

    pub fn proxies(&self) -> &[Url] {
        &self.proxies
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
