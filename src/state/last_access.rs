use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// About thirty years
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returned when a crawl-delay wait is cut short by cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Tracks when each domain was last granted a fetch
///
/// A single mutex guards the whole table. Each caller reserves its start
/// instant while holding the lock and sleeps after releasing it, so
/// concurrent callers for one domain get distinct slots spaced by the delay.
#[derive(Debug, Default)]
pub struct LastAccessTable {
    slots: Mutex<HashMap<String, Instant>>,
}

impl LastAccessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next permitted start instant for a domain
    ///
    /// The reservation is `max(now, last + delay)` and becomes the domain's
    /// new last-access instant immediately.
    ///
    /// # Arguments
    ///
    /// * `domain` - Hostname the fetch targets
    /// * `delay` - Effective crawl delay for this domain
    /// * `now` - The current time instant
    pub fn reserve(&self, domain: &str, delay: Duration, now: Instant) -> Instant {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        let slot = match slots.get(domain) {
            Some(last) => last
                .checked_add(delay)
                .unwrap_or_else(|| far_future(now))
                .max(now),
            None => now,
        };
        slots.insert(domain.to_string(), slot);
        slot
    }

    /// Waits until this caller's turn for the domain
    ///
    /// # Returns
    ///
    /// * `Ok(Instant)` - The reserved start instant, now reached
    /// * `Err(Interrupted)` - `cancel` fired first; the reservation stays recorded
    pub async fn wait_turn(
        &self,
        domain: &str,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<Instant, Interrupted> {
        let slot = self.reserve(domain, delay, Instant::now());

        if slot > Instant::now() {
            tracing::trace!("Waiting until {:?} for domain {}", slot, domain);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Interrupted),
                _ = tokio::time::sleep_until(slot) => {}
            }
        }

        Ok(slot)
    }
}

/// Fallback slot when `last + delay` overflows
fn far_future(now: Instant) -> Instant {
    now + FAR_FUTURE
}
