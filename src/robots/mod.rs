//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files. A server error means "stay out"; a network failure or an
//! unexpected status is treated as "no restrictions" and not remembered.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::{product_token, ParsedRobots};

use crate::crawler::HttpTransport;
use crate::ChewError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetches robots.txt for an origin
///
/// | Response                     | Result                          |
/// |------------------------------|---------------------------------|
/// | 2xx                          | Parsed body, cacheable          |
/// | 4xx                          | Allow-all record, cacheable     |
/// | 5xx                          | Disallow-all record, cacheable  |
/// | Network failure / other      | `None`: allow, do not cache     |
///
/// # Arguments
///
/// * `transport` - The transport to send the request through
/// * `origin` - The `scheme://host[:port]` to fetch from
/// * `cancel` - Cancellation for the in-flight request
///
/// # Returns
///
/// * `Ok(Some(ParsedRobots))` - A record to cache for this origin
/// * `Ok(None)` - robots.txt unavailable; treat as allowed
/// * `Err(ChewError::Cancelled)` - Cancelled while fetching
pub async fn fetch_robots(
    transport: &HttpTransport,
    origin: &str,
    cancel: &CancellationToken,
) -> Result<Option<ParsedRobots>, ChewError> {
    let robots_url = match Url::parse(&format!("{}/robots.txt", origin)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", origin, e);
            return Ok(None);
        }
    };

    let fetched = match transport.get(&robots_url, cancel).await {
        Ok(fetched) => fetched,
        Err(ChewError::Cancelled) => return Err(ChewError::Cancelled),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}; assuming allowed", robots_url, e);
            return Ok(None);
        }
    };

    let status = fetched.status;
    if status.is_success() {
        let body = String::from_utf8_lossy(&fetched.body);
        tracing::debug!("Fetched {} ({} bytes)", robots_url, fetched.body.len());
        Ok(Some(ParsedRobots::from_content(&body)))
    } else if status.is_client_error() {
        tracing::debug!("{} returned {}; no restrictions", robots_url, status);
        Ok(Some(ParsedRobots::allow_all()))
    } else if status.is_server_error() {
        tracing::warn!("{} returned {}; treating origin as disallowed", robots_url, status);
        Ok(Some(ParsedRobots::disallow_all()))
    } else {
        tracing::warn!("{} returned {}; assuming allowed", robots_url, status);
        Ok(None)
    }
}
