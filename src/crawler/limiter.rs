//! Admission control
//!
//! Every remote fetch takes a permit from one shared rate limiter before any
//! network or politeness work starts.

use crate::config::RateLimitConfig;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a permit could not be granted
#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("wait cancelled")]
    Cancelled,

    #[error("{0}")]
    Rejected(String),
}

/// A gate that decides when the next fetch may begin
///
/// Implementations must return promptly with [`LimiterError::Cancelled`]
/// once `cancel` fires.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self, cancel: &CancellationToken) -> Result<(), LimiterError>;
}

/// Token-bucket limiter: one permit per interval, up to `burst` saved up
pub struct TokenBucket {
    /// None when the interval is zero, i.e. unlimited
    limiter: Option<DefaultDirectRateLimiter>,
}

impl TokenBucket {
    /// Creates a new limiter
    ///
    /// # Arguments
    ///
    /// * `interval` - Time for one permit to replenish; zero disables limiting
    /// * `burst` - Bucket capacity; zero is treated as one
    pub fn new(interval: Duration, burst: u32) -> Self {
        let capacity = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        let limiter = Quota::with_period(interval)
            .map(|quota| governor::RateLimiter::direct(quota.allow_burst(capacity)));

        Self { limiter }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.interval(), config.burst)
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn wait(&self, cancel: &CancellationToken) -> Result<(), LimiterError> {
        let Some(limiter) = &self.limiter else {
            return if cancel.is_cancelled() {
                Err(LimiterError::Cancelled)
            } else {
                Ok(())
            };
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LimiterError::Cancelled),
            _ = limiter.until_ready() => Ok(()),
        }
    }
}
