use super::{ExtractError, Extractor};
use crate::Chunk;

/// Emits one chunk per CSV record, fields joined with `", "`
///
/// There is no header row; every record becomes a chunk. Records must all
/// have the same number of fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExtractor;

impl Extractor for CsvExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(body);

        reader
            .records()
            .map(|record| -> Result<Chunk, ExtractError> {
                let record = record?;
                let line = record.iter().collect::<Vec<_>>().join(", ");
                Ok(Chunk::new(line, source))
            })
            .collect()
    }
}
