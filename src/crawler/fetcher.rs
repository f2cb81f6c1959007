//! HTTP fetcher implementation
//!
//! This module handles all outbound requests, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - Rotating through configured proxies, one turn per request
//! - Honouring a caller-supplied client instead of the built-in ones
//! - Racing every request against the batch cancellation token

use crate::config::Config;
use crate::crawler::proxy::ProxyRotation;
use crate::{ChewError, ConfigError};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Upper bound on connection setup, independent of the overall timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header value, empty if absent
    pub content_type: String,
    /// Response body
    pub body: Vec<u8>,
}

impl FetchedBody {
    /// Converts a non-2xx response into `ChewError::HttpStatus`
    pub fn error_for_status(self, url: &Url) -> Result<Self, ChewError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ChewError::HttpStatus {
                url: url.to_string(),
                status_code: self.status.as_u16(),
            })
        }
    }
}

/// Which client(s) requests go through
enum Clients {
    /// Caller-supplied client; no rotation applied
    Custom(Client),
    /// No proxies configured
    Direct(Client),
    /// One client per proxy, picked by the rotation
    Rotating {
        clients: Vec<Client>,
        rotation: ProxyRotation,
    },
}

/// Outbound transport shared by every task of a coordinator
pub struct HttpTransport {
    clients: Clients,
    user_agent: String,
}

impl HttpTransport {
    /// Builds the transport from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpTransport)` - Direct client, or one client per proxy
    /// * `Err(ConfigError)` - A proxy URL is invalid or a client failed to build
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let rotation = ProxyRotation::from_config(&config.transport.proxies)?;

        let clients = if rotation.is_empty() {
            Clients::Direct(build_http_client(config, None)?)
        } else {
            let clients = rotation
                .proxies()
                .iter()
                .map(|proxy| build_http_client(config, Some(proxy)))
                .collect::<Result<Vec<_>, _>>()?;
            Clients::Rotating { clients, rotation }
        };

        Ok(Self {
            clients,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Uses a caller-supplied client for every request
    pub fn with_client(client: Client, user_agent: &str) -> Self {
        Self {
            clients: Clients::Custom(client),
            user_agent: user_agent.to_string(),
        }
    }

    /// Picks the client for one request, advancing the proxy rotation once
    fn next_client(&self) -> &Client {
        match &self.clients {
            Clients::Custom(client) | Clients::Direct(client) => client,
            Clients::Rotating { clients, rotation } => match rotation.next_proxy() {
                Some((index, proxy)) => {
                    tracing::trace!("Routing request via proxy {}", proxy);
                    &clients[index]
                }
                None => &clients[0],
            },
        }
    }

    /// Sends a GET request and reads the whole body
    ///
    /// Non-2xx responses are returned as-is; use
    /// [`FetchedBody::error_for_status`] where they should fail.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedBody)` - Response received and body read
    /// * `Err(ChewError::Transport)` - Connection, timeout or body read failure
    /// * `Err(ChewError::Cancelled)` - `cancel` fired before completion
    pub async fn get(&self, url: &Url, cancel: &CancellationToken) -> Result<FetchedBody, ChewError> {
        let request = self
            .next_client()
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.as_str());

        let transport_error = |source: reqwest::Error| ChewError::Transport {
            url: url.to_string(),
            source,
        };

        let fetch = async {
            let response = request.send().await.map_err(transport_error)?;

            let status = response.status();
            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let body = response.bytes().await.map_err(transport_error)?.to_vec();

            Ok(FetchedBody {
                final_url,
                status,
                content_type,
                body,
            })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChewError::Cancelled),
            result = fetch => result,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Supplies the user agent and request timeout
/// * `proxy` - Proxy for every request made by this client, or None for direct
///
/// # Example
///
/// ```no_run
/// use chew::config::Config;
/// use chew::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default(), None).unwrap();
/// ```
pub fn build_http_client(config: &Config, proxy: Option<&Url>) -> Result<Client, reqwest::Error> {
    let timeout = config.transport.timeout();

    let builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true);

    let builder = match proxy {
        Some(proxy) => builder.proxy(Proxy::all(proxy.clone())?),
        // Ignore proxy environment variables: no configured proxies means direct
        None => builder.no_proxy(),
    };

    builder.build()
}
