use super::{ExtractError, Extractor};
use crate::Chunk;
use serde_json::Value;

/// Validates a JSON document and emits it pretty-printed as one chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        let value: Value = serde_json::from_slice(body)?;
        let pretty = serde_json::to_string_pretty(&value)?;
        Ok(vec![Chunk::new(pretty, source)])
    }
}
