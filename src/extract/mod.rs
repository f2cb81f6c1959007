//! Content extraction
//!
//! Extractors turn a fetched body into chunks. They are looked up through an
//! [`ExtractorRegistry`], first by declared content type and then by file
//! extension. Common text and data formats are built in; richer formats (PDF,
//! DOCX, EPUB, ...) are plugged in by registering more extractors.

mod csv;
mod html;
mod json;
mod registry;
mod sniff;
mod text;
mod xml;
mod yaml;

pub use self::csv::CsvExtractor;
pub use html::HtmlExtractor;
pub use json::JsonExtractor;
pub use registry::ExtractorRegistry;
pub use sniff::sniff_content_type;
pub use text::PlainTextExtractor;
pub use xml::XmlExtractor;
pub use yaml::YamlExtractor;

use crate::Chunk;
use thiserror::Error;

/// Errors produced by extractors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed content: {0}")]
    Malformed(String),
}

/// Turns a fetched body into chunks labelled with `source`
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError>;
}

impl<F> Extractor for F
where
    F: Fn(&[u8], &str) -> Result<Vec<Chunk>, ExtractError> + Send + Sync,
{
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        self(body, source)
    }
}
