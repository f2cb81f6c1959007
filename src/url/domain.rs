use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a remote locator into a URL that has a host
///
/// # Examples
///
/// ```
/// use chew::url::parse_remote;
///
/// assert!(parse_remote("https://example.com/page").is_ok());
/// assert!(parse_remote("not a url").is_err());
/// assert!(parse_remote("mailto:someone@example.com").is_err());
/// ```
pub fn parse_remote(locator: &str) -> UrlResult<Url> {
    let url = Url::parse(locator)?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }
    Ok(url)
}

/// Extracts the domain from a URL
///
/// Returns the lowercase host without port; this is the key for crawl-delay
/// bookkeeping.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use chew::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the origin of a URL (`scheme://host[:port]`), the robots.txt cache key
///
/// # Examples
///
/// ```
/// use url::Url;
/// use chew::url::origin;
///
/// let url = Url::parse("http://127.0.0.1:8080/a/b?q=1").unwrap();
/// assert_eq!(origin(&url), "http://127.0.0.1:8080");
/// ```
pub fn origin(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
