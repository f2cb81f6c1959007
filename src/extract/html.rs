//! HTML text extraction
//!
//! Emits one chunk per text-bearing block element (`p`, headings, `li`),
//! skipping page chrome inside `nav`, `header` and `footer`.

use super::{ExtractError, Extractor};
use crate::Chunk;
use scraper::{ElementRef, Html, Selector};

const BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li";
const CHROME_ELEMENTS: &[&str] = &["nav", "header", "footer"];

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let selector = Selector::parse(BLOCK_SELECTOR)
            .map_err(|e| ExtractError::Malformed(format!("bad selector: {}", e)))?;

        let chunks = document
            .select(&selector)
            .filter(|element| !inside_chrome(element))
            .filter_map(|element| {
                let text = element.text().collect::<String>();
                let text = text.trim();
                (!text.is_empty()).then(|| Chunk::new(text, source))
            })
            .collect();

        Ok(chunks)
    }
}

/// Returns true if the element sits inside navigation, header or footer markup
fn inside_chrome(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| CHROME_ELEMENTS.contains(&ancestor.value().name()))
}
