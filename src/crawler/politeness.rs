//! robots.txt compliance and per-domain crawl delay

use crate::crawler::HttpTransport;
use crate::robots::{fetch_robots, product_token, RobotsCache};
use crate::state::LastAccessTable;
use crate::url::{extract_domain, origin};
use crate::ChewError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of a robots.txt check for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    /// Delay to apply for this URL's domain
    pub crawl_delay: Duration,
}

/// Per-coordinator politeness state
pub struct Politeness {
    robots: RobotsCache,
    last_access: LastAccessTable,
    /// Product token matched against robots.txt user-agent lines
    agent: String,
    default_delay: Duration,
}

impl Politeness {
    /// Creates a new politeness policy
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Full User-Agent string; only its product token is matched
    /// * `default_delay` - Crawl delay used unless robots.txt advertises one
    pub fn new(user_agent: &str, default_delay: Duration) -> Self {
        Self {
            robots: RobotsCache::new(),
            last_access: LastAccessTable::new(),
            agent: product_token(user_agent).to_string(),
            default_delay,
        }
    }

    /// Checks robots.txt for `url`, fetching and caching it on first use
    ///
    /// A fetch that yields no record (network failure, unexpected status) allows
    /// the URL with the default delay and leaves the cache empty, so a later
    /// task fetches again.
    pub async fn robots_verdict(
        &self,
        transport: &HttpTransport,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<RobotsVerdict, ChewError> {
        let origin = origin(url);

        let robots = match self.robots.get(&origin) {
            Some(robots) => Some(robots),
            None => fetch_robots(transport, &origin, cancel)
                .await?
                .map(|parsed| self.robots.insert(&origin, parsed)),
        };

        let Some(robots) = robots else {
            return Ok(RobotsVerdict {
                allowed: true,
                crawl_delay: self.default_delay,
            });
        };

        Ok(RobotsVerdict {
            allowed: robots.is_allowed(url.as_str(), &self.agent),
            crawl_delay: robots.crawl_delay(&self.agent).unwrap_or(self.default_delay),
        })
    }

    /// Waits for this URL's slot in its domain's crawl-delay schedule
    pub async fn respect_crawl_delay(
        &self,
        url: &Url,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ChewError> {
        let Some(domain) = extract_domain(url) else {
            return Ok(());
        };

        self.last_access
            .wait_turn(&domain, delay, cancel)
            .await
            .map(|_| ())
            .map_err(|_| ChewError::CrawlDelayInterrupted {
                url: url.to_string(),
            })
    }

    /// Applies the full policy: robots check, then crawl delay
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The fetch may start now
    /// * `Err(ChewError::RobotsDisallowed)` - robots.txt forbids the URL
    /// * `Err(ChewError::CrawlDelayInterrupted)` - Cancelled during the delay
    /// * `Err(ChewError::Cancelled)` - Cancelled during the robots.txt fetch
    pub async fn enforce(
        &self,
        transport: &HttpTransport,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<(), ChewError> {
        let verdict = self.robots_verdict(transport, url, cancel).await?;

        if !verdict.allowed {
            tracing::debug!("{} disallowed by robots.txt", url);
            return Err(ChewError::RobotsDisallowed {
                url: url.to_string(),
            });
        }

        self.respect_crawl_delay(url, verdict.crawl_delay, cancel).await
    }
}
