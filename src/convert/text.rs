//! Plain text and Markdown reader.

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};

use super::{DocumentReader, SourceBlock, SourceDocument};

/// Reads UTF-8 text files, one paragraph block per line.
#[derive(Debug, Clone, Default)]
pub struct TextReader {
    _private: (),
}

impl TextReader {
    /// Create a new text reader.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentReader for TextReader {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text", "md", "markdown"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<SourceDocument> {
        let format = detect_format_from_bytes(bytes);
        if format != InputFormat::Text {
            return Err(Error::UnreadableInput(format!(
                "expected UTF-8 text, found {}",
                format
            )));
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::UnreadableInput(format!("invalid UTF-8: {}", e)))?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

        let mut doc = SourceDocument::new();
        for line in text.lines() {
            doc.push(SourceBlock::paragraph(line));
        }
        Ok(doc)
    }
}
