use serde::Deserialize;
use std::time::Duration;

/// Default user agent sent with every request and matched against robots.txt
pub const DEFAULT_USER_AGENT: &str = concat!("chew/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure for Chew
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-Agent header value; its product token is used for robots.txt matching
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub retry: RetryConfig,

    pub politeness: PolitenessConfig,

    #[serde(rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,

    pub transport: TransportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
            politeness: PolitenessConfig::default(),
            rate_limit: RateLimitConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// Retry behavior for the final fetch-and-extract step
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub limit: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            limit: 3,
            delay_ms: 1000,
        }
    }
}

/// robots.txt and crawl-delay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Minimum time between requests to the same domain (milliseconds),
    /// used unless robots.txt advertises its own Crawl-delay
    #[serde(rename = "crawl-delay-ms")]
    pub crawl_delay_ms: u64,

    /// Skip robots.txt and crawl-delay enforcement entirely
    #[serde(rename = "ignore-robots-txt")]
    pub ignore_robots_txt: bool,
}

impl PolitenessConfig {
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay_ms)
    }
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            crawl_delay_ms: 1000,
            ignore_robots_txt: false,
        }
    }
}

/// Global admission rate limit
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Interval at which one new permit becomes available (milliseconds).
    /// Zero disables rate limiting.
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Maximum number of permits that can accumulate
    pub burst: u32,
}

impl RateLimitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            burst: 1,
        }
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Proxy URLs rotated round-robin per request; empty means direct
    pub proxies: Vec<String>,

    /// Overall request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            proxies: Vec::new(),
            timeout_secs: 30,
        }
    }
}
