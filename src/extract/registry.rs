//! Content-type resolution
//!
//! Maps a declared content type, or failing that the locator's file
//! extension, to the extractor that should handle the body.

use super::{
    CsvExtractor, Extractor, HtmlExtractor, JsonExtractor, PlainTextExtractor, XmlExtractor,
    YamlExtractor,
};
use crate::url::file_extension;
use crate::ChewError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lookup tables from content type and extension to extractors
///
/// Content-type keys are matched as substrings of the declared type, in
/// registration order; the first match wins. Extension keys are matched
/// exactly, without the leading dot.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    content_types: Vec<(String, Arc<dyn Extractor>)>,
    extensions: HashMap<String, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in text extractors
    ///
    /// Content types are tried in table order.
    ///
    /// | Content type          | Extensions    | Extractor              |
    /// |-----------------------|---------------|------------------------|
    /// | `text/html`           | `html`, `htm` | [`HtmlExtractor`]      |
    /// | `text/csv`            | `csv`         | [`CsvExtractor`]       |
    /// | `application/json`    | `json`        | [`JsonExtractor`]      |
    /// | `application/x-yaml`  | `yaml`        | [`YamlExtractor`]      |
    /// | `text/markdown`       | `md`          | [`PlainTextExtractor`] |
    /// | `text/plain`          | `txt`         | [`PlainTextExtractor`] |
    /// | `application/xml`     | `xml`         | [`XmlExtractor`]       |
    /// | `text/xml`            |               | [`XmlExtractor`]       |
    pub fn with_defaults() -> Self {
        let html: Arc<dyn Extractor> = Arc::new(HtmlExtractor);
        let csv: Arc<dyn Extractor> = Arc::new(CsvExtractor);
        let json: Arc<dyn Extractor> = Arc::new(JsonExtractor);
        let yaml: Arc<dyn Extractor> = Arc::new(YamlExtractor);
        let text: Arc<dyn Extractor> = Arc::new(PlainTextExtractor);
        let xml: Arc<dyn Extractor> = Arc::new(XmlExtractor);

        let mut registry = Self::new();
        registry
            .register_content_type("text/html", html.clone())
            .register_content_type("text/csv", csv.clone())
            .register_content_type("application/json", json.clone())
            .register_content_type("application/x-yaml", yaml.clone())
            .register_content_type("text/markdown", text.clone())
            .register_content_type("text/plain", text.clone())
            .register_content_type("application/xml", xml.clone())
            .register_content_type("text/xml", xml.clone())
            .register_extension("html", html.clone())
            .register_extension("htm", html)
            .register_extension("csv", csv)
            .register_extension("json", json)
            .register_extension("yaml", yaml)
            .register_extension("md", text.clone())
            .register_extension("txt", text)
            .register_extension("xml", xml);
        registry
    }

    /// Registers an extractor for a content-type substring
    ///
    /// Re-registering a key replaces its extractor but keeps its position.
    /// Empty keys are ignored since they would match every content type.
    pub fn register_content_type(
        &mut self,
        content_type: &str,
        extractor: Arc<dyn Extractor>,
    ) -> &mut Self {
        let key = content_type.trim().to_lowercase();
        if key.is_empty() {
            return self;
        }

        match self.content_types.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = extractor,
            None => self.content_types.push((key, extractor)),
        }
        self
    }

    /// Registers an extractor for a file extension (with or without the dot)
    pub fn register_extension(&mut self, extension: &str, extractor: Arc<dyn Extractor>) -> &mut Self {
        let key = extension.trim().trim_start_matches('.').to_lowercase();
        if !key.is_empty() {
            self.extensions.insert(key, extractor);
        }
        self
    }

    /// Selects the extractor for a body
    ///
    /// # Arguments
    ///
    /// * `content_type` - The declared content type, possibly empty
    /// * `locator` - The URL or path the body came from, for the extension fallback
    ///
    /// # Returns
    ///
    /// * `Ok(extractor)` - First content-type match, else the extension match
    /// * `Err(ChewError::UnsupportedContentType)` - Neither table matched
    pub fn resolve(
        &self,
        content_type: &str,
        locator: &str,
    ) -> Result<Arc<dyn Extractor>, ChewError> {
        let declared = content_type.to_lowercase();

        if let Some((key, extractor)) = self
            .content_types
            .iter()
            .find(|(key, _)| declared.contains(key.as_str()))
        {
            tracing::trace!("Content type {:?} matched {:?}", content_type, key);
            return Ok(extractor.clone());
        }

        if let Some(extractor) = file_extension(locator).and_then(|ext| self.extensions.get(&ext)) {
            tracing::trace!("Falling back to extension of {}", locator);
            return Ok(extractor.clone());
        }

        Err(ChewError::UnsupportedContentType {
            content_type: content_type.to_string(),
        })
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&String> = self.extensions.keys().collect();
        extensions.sort();
        f.debug_struct("ExtractorRegistry")
            .field(
                "content_types",
                &self.content_types.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("extensions", &extensions)
            .finish()
    }
}
