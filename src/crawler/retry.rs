//! Fixed-delay retry for the fetch-and-extract step

use crate::config::RetryConfig;
use crate::ChewError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How often and how far apart to retry a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub limit: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(limit: u32, delay: Duration) -> Self {
        Self { limit, delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.limit, config.delay())
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out
    ///
    /// Only errors for which [`ChewError::is_retryable`] holds are retried, so
    /// at most `limit + 1` attempts are made. The last error is returned
    /// unchanged.
    ///
    /// # Arguments
    ///
    /// * `label` - Locator used in log lines
    /// * `cancel` - Interrupts the pause between attempts
    /// * `attempt` - Produces one fresh attempt per call
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        mut attempt: F,
    ) -> Result<T, ChewError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ChewError>>,
    {
        let mut retries = 0;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries < self.limit => {
                    retries += 1;
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        retries,
                        self.limit + 1,
                        label,
                        e,
                        self.delay
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ChewError::Cancelled),
                        _ = tokio::time::sleep(self.delay) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
