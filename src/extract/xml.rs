use super::{ExtractError, Extractor};
use crate::Chunk;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Emits one chunk per non-blank text node inside an element
///
/// Entities are unescaped and CDATA sections are kept as-is. Markup,
/// attributes and comments produce nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExtractor;

impl Extractor for XmlExtractor {
    fn extract(&self, body: &[u8], source: &str) -> Result<Vec<Chunk>, ExtractError> {
        let mut reader = Reader::from_reader(body);
        reader.trim_text(true);

        let mut chunks = Vec::new();
        let mut buf = Vec::new();
        let mut inside_element = false;

        loop {
            let text = match reader.read_event_into(&mut buf)? {
                Event::Start(_) | Event::Empty(_) => {
                    inside_element = true;
                    None
                }
                Event::Text(t) => Some(t.unescape()?.into_owned()),
                Event::CData(c) => Some(String::from_utf8_lossy(&c.into_inner()).into_owned()),
                Event::Eof => break,
                _ => None,
            };

            if let Some(text) = text {
                let text = text.trim();
                if inside_element && !text.is_empty() {
                    chunks.push(Chunk::new(text, source));
                }
            }
            buf.clear();
        }

        Ok(chunks)
    }
}
