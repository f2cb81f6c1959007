use super::{ExtractError, Extractor};
use crate::Chunk;
use serde_yaml::Value;

/// Validates a YAML document and emits it re-serialized as one chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlExtractor;

impl Extractor for YamlExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        let value: Value = serde_yaml::from_slice(body)?;
        let normalized = serde_yaml::to_string(&value)?;
        Ok(vec![Chunk::new(normalized, source)])
    }
}
