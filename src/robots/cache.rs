//! Robots.txt caching implementation
//!
//! Records are keyed by origin, written once, and kept for the lifetime of
//! the owning coordinator.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-origin cache of parsed robots.txt files
#[derive(Debug, Default)]
pub struct RobotsCache {
    records: RwLock<HashMap<String, Arc<ParsedRobots>>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached record for an origin, if any
    pub fn get(&self, origin: &str) -> Option<Arc<ParsedRobots>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(origin)
            .cloned()
    }

    /// Stores a record unless another task already stored one
    ///
    /// Returns the record that ended up in the cache, so concurrent fetchers
    /// of the same origin all agree on the first writer's result.
    pub fn insert(&self, origin: &str, robots: ParsedRobots) -> Arc<ParsedRobots> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(origin.to_string())
            .or_insert_with(|| Arc::new(robots))
            .clone()
    }

    /// Number of cached origins
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
