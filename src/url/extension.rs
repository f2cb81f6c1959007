use std::path::Path;
use url::Url;

/// Derives the lowercase file extension (without the dot) of a locator
///
/// For URLs only the path component is considered, so query strings and
/// fragments never leak into the extension. Anything that does not parse as
/// a URL with a host is treated as a filesystem path.
///
/// # Examples
///
/// ```
/// use chew::url::file_extension;
///
/// assert_eq!(file_extension("https://example.com/data.JSON?v=2"), Some("json".to_string()));
/// assert_eq!(file_extension("/tmp/notes.md"), Some("md".to_string()));
/// assert_eq!(file_extension("https://example.com/"), None);
/// ```
pub fn file_extension(locator: &str) -> Option<String> {
    let path = match Url::parse(locator) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => locator.to_string(),
    };

    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}
