//! Crawler module for polite content fetching
//!
//! This module contains the core fetching logic, including:
//! - HTTP transport with proxy rotation
//! - Admission control through a shared rate limiter
//! - robots.txt compliance and per-domain crawl delay
//! - Retry of the fetch-and-extract step
//! - Overall batch coordination

mod coordinator;
mod fetcher;
mod limiter;
mod politeness;
mod proxy;
mod retry;

pub use coordinator::{BatchState, Coordinator, CoordinatorBuilder};
pub use fetcher::{build_http_client, FetchedBody, HttpTransport};
pub use limiter::{LimiterError, RateLimiter, TokenBucket};
pub use politeness::{Politeness, RobotsVerdict};
pub use proxy::ProxyRotation;
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::{ChewError, Chunk};
use tokio_util::sync::CancellationToken;

/// Fetches a batch of locators with a one-off coordinator
///
/// This is the simplest entry point. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP transport and default extractors
/// 3. Process every locator, stopping at the first error
///
/// # Arguments
///
/// * `config` - The fetch configuration
/// * `cancel` - Cancels the whole batch
/// * `locators` - Remote URLs or `file://` paths
///
/// # Returns
///
/// * `Ok(Vec<Chunk>)` - All chunks, in completion order
/// * `Err(ChewError)` - Configuration was invalid or a locator failed
pub async fn fetch_all<S: AsRef<str>>(
    config: Config,
    cancel: &CancellationToken,
    locators: &[S],
) -> Result<Vec<Chunk>, ChewError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.process(cancel, locators).await
}
