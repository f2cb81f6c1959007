use super::{ExtractError, Extractor};
use crate::Chunk;

/// Emits the whole body as a single chunk
///
/// Invalid UTF-8 sequences are replaced rather than rejected. An empty body
/// produces no chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        if body.is_empty() {
            return Ok(Vec::new());
        }

        let content = String::from_utf8_lossy(body).into_owned();
        Ok(vec![Chunk::new(content, source)])
    }
}
