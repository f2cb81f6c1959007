//! Fetch coordinator - batch orchestration logic
//!
//! This module turns a list of locators into chunks. Each call to
//! [`Coordinator::process`] fans out one task per locator and:
//! - Gates every remote fetch through the shared rate limiter
//! - Applies robots.txt and per-domain crawl delay unless disabled
//! - Retries the fetch-and-extract step on transient failure
//! - Aborts the whole batch on the first error or on cancellation

use crate::config::{validate, Config};
use crate::crawler::{HttpTransport, Politeness, RateLimiter, RetryPolicy, TokenBucket};
use crate::extract::{sniff_content_type, ExtractorRegistry};
use crate::url::{parse_remote, Locator};
use crate::{ChewError, Chunk, ConfigError};
use reqwest::Client;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Lifecycle of one `process` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// State shared by every clone of a coordinator and every task it spawns
struct Shared {
    config: Config,
    transport: HttpTransport,
    politeness: Politeness,
    retry: RetryPolicy,
    limiter: RwLock<Arc<dyn RateLimiter>>,
    registry: RwLock<Arc<ExtractorRegistry>>,
}

/// Main coordinator structure
///
/// Cloning is cheap and every clone shares the same robots cache, crawl-delay
/// table, proxy rotation and rate limiter. Concurrent `process` calls on one
/// coordinator are safe.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Coordinator {
    /// Creates a coordinator with the default client, limiter and extractors
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to process locators
    /// * `Err(ConfigError)` - Configuration is invalid or the client failed to build
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Replaces the rate limiter; batches already waiting keep the old one
    pub fn set_rate_limiter(&self, limiter: Arc<dyn RateLimiter>) {
        *self
            .shared
            .limiter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = limiter;
    }

    /// Replaces the extractor registry as a unit
    pub fn set_registry(&self, registry: ExtractorRegistry) {
        *self
            .shared
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(registry);
    }

    /// Fetches every locator and returns all chunks in completion order
    ///
    /// The first failing locator cancels the rest of the batch and its error
    /// is returned; partial results are discarded. Tasks still running when
    /// this returns are aborted.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Caller's cancellation; firing it makes the call return `Cancelled`
    /// * `locators` - Remote URLs or `file://` paths
    pub async fn process<S: AsRef<str>>(
        &self,
        cancel: &CancellationToken,
        locators: &[S],
    ) -> Result<Vec<Chunk>, ChewError> {
        let mut state = BatchState::Pending;
        tracing::debug!("Batch of {} locators {}", locators.len(), state);

        if locators.is_empty() {
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(ChewError::Cancelled);
        }

        let batch = cancel.child_token();
        let _cancel_on_return = batch.clone().drop_guard();

        let mut tasks = JoinSet::new();
        for locator in locators {
            let shared = self.shared.clone();
            let token = batch.clone();
            let locator = locator.as_ref().to_string();
            tasks.spawn(async move { shared.fetch_one(&locator, &token).await });
        }

        state = BatchState::Running;
        tracing::info!("Batch of {} locators {}", locators.len(), state);
        let started = std::time::Instant::now();

        let mut chunks = Vec::new();
        let outcome = loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => break Err(ChewError::Cancelled),
                joined = tasks.join_next() => joined,
            };

            match joined {
                None => break Ok(()),
                Some(Ok(Ok(found))) => chunks.extend(found),
                Some(Ok(Err(e))) => break Err(e),
                Some(Err(e)) => break Err(ChewError::Task(e.to_string())),
            }
        };

        match outcome {
            Ok(()) => {
                state = BatchState::Completed;
                tracing::info!(
                    "Batch {}: {} chunks in {:.2}s",
                    state,
                    chunks.len(),
                    started.elapsed().as_secs_f64()
                );
                Ok(chunks)
            }
            Err(e) => {
                batch.cancel();
                state = match e {
                    ChewError::Cancelled => BatchState::Cancelled,
                    _ => BatchState::Failed,
                };
                tracing::info!("Batch {}: {}", state, e);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn limiter(&self) -> Arc<dyn RateLimiter> {
        self.limiter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn registry(&self) -> Arc<ExtractorRegistry> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handles one locator from classification to chunks
    async fn fetch_one(&self, locator: &str, cancel: &CancellationToken) -> Result<Vec<Chunk>, ChewError> {
        if cancel.is_cancelled() {
            return Err(ChewError::Cancelled);
        }

        let chunks = match Locator::classify(locator) {
            Locator::LocalFile(path) => self.fetch_local(locator, &path, cancel).await?,
            Locator::Remote(raw) => self.fetch_remote(&raw, cancel).await?,
        };

        tracing::debug!("{}: {} chunks", locator, chunks.len());
        Ok(chunks)
    }

    async fn fetch_remote(&self, locator: &str, cancel: &CancellationToken) -> Result<Vec<Chunk>, ChewError> {
        let url = parse_remote(locator).map_err(|e| ChewError::InvalidLocator {
            locator: locator.to_string(),
            reason: e.to_string(),
        })?;

        self.limiter()
            .wait(cancel)
            .await
            .map_err(|e| ChewError::RateLimitExceeded {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;

        if !self.config.politeness.ignore_robots_txt {
            self.politeness.enforce(&self.transport, &url, cancel).await?;
        }

        let registry = self.registry();
        let (url, registry) = (&url, &registry);
        self.retry
            .run(locator, cancel, move || {
                self.fetch_and_extract(locator, url, registry, cancel)
            })
            .await
    }

    /// One attempt: GET, resolve an extractor, extract
    ///
    /// Chunks are labelled with the caller's `locator`, not the parsed URL.
    async fn fetch_and_extract(
        &self,
        locator: &str,
        url: &Url,
        registry: &ExtractorRegistry,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chunk>, ChewError> {
        let fetched = self.transport.get(url, cancel).await?.error_for_status(url)?;
        tracing::debug!(
            "Fetched {} ({}, {} bytes)",
            fetched.final_url,
            fetched.content_type,
            fetched.body.len()
        );

        let extractor = registry.resolve(&fetched.content_type, url.as_str())?;
        extractor
            .extract(&fetched.body, locator)
            .map_err(|source| ChewError::Extraction {
                source_label: locator.to_string(),
                source,
            })
    }

    async fn fetch_local(
        &self,
        locator: &str,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chunk>, ChewError> {
        let registry = self.registry();
        let registry = &registry;

        self.retry
            .run(locator, cancel, move || async move {
                let body = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ChewError::Cancelled),
                    read = tokio::fs::read(path) => read,
                };

                let body = body.map_err(|e| match e.kind() {
                    ErrorKind::NotFound => ChewError::InvalidLocator {
                        locator: locator.to_string(),
                        reason: e.to_string(),
                    },
                    _ => ChewError::LocalFile {
                        path: path.display().to_string(),
                        source: e,
                    },
                })?;

                let content_type = sniff_content_type(&body);
                let extractor = registry.resolve(content_type, &path.to_string_lossy())?;
                extractor
                    .extract(&body, locator)
                    .map_err(|source| ChewError::Extraction {
                        source_label: locator.to_string(),
                        source,
                    })
            })
            .await
    }
}

/// Builder for [`Coordinator`]
pub struct CoordinatorBuilder {
    config: Config,
    client: Option<Client>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    registry: Option<ExtractorRegistry>,
}

impl CoordinatorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: None,
            rate_limiter: None,
            registry: None,
        }
    }

    /// Sends every request through this client; proxy rotation is not applied
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validates the configuration and assembles the coordinator
    pub fn build(self) -> Result<Coordinator, ConfigError> {
        validate(&self.config)?;

        let transport = match self.client {
            Some(client) => HttpTransport::with_client(client, &self.config.user_agent),
            None => HttpTransport::new(&self.config)?,
        };

        let limiter = self
            .rate_limiter
            .unwrap_or_else(|| Arc::new(TokenBucket::from_config(&self.config.rate_limit)));
        let registry = self.registry.unwrap_or_else(ExtractorRegistry::with_defaults);

        let politeness = Politeness::new(
            &self.config.user_agent,
            self.config.politeness.crawl_delay(),
        );
        let retry = RetryPolicy::from_config(&self.config.retry);

        tracing::debug!(
            "Coordinator ready: retry limit {}, crawl delay {:?}, robots {}",
            retry.limit,
            self.config.politeness.crawl_delay(),
            if self.config.politeness.ignore_robots_txt {
                "ignored"
            } else {
                "respected"
            }
        );

        Ok(Coordinator {
            shared: Arc::new(Shared {
                config: self.config,
                transport,
                politeness,
                retry,
                limiter: RwLock::new(limiter),
                registry: RwLock::new(Arc::new(registry)),
            }),
        })
    }
}
