//! Input format detection from leading bytes.

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected.
const SNIFF_LEN: usize = 8192;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detected kind of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// UTF-8 text
    Text,
    /// ZIP container (DOCX, ODT, ...)
    Zip,
    /// PDF document
    Pdf,
    /// Anything else
    Binary,
}

impl InputFormat {
    /// Whether the built-in text reader can handle this input.
    pub fn is_text(self) -> bool {
        self == InputFormat::Text
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InputFormat::Text => "text",
            InputFormat::Zip => "zip container",
            InputFormat::Pdf => "pdf",
            InputFormat::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// Detect the input format from the start of the data.
pub fn detect_format_from_bytes(data: &[u8]) -> InputFormat {
    if data.starts_with(PDF_MAGIC) {
        return InputFormat::Pdf;
    }
    if data.starts_with(ZIP_MAGIC) {
        return InputFormat::Zip;
    }

    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let sample = &data[..data.len().min(SNIFF_LEN)];
    if sample.contains(&0) {
        return InputFormat::Binary;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => InputFormat::Text,
        // The sample may end inside a multi-byte character.
        Err(e) if e.error_len().is_none() && data.len() > SNIFF_LEN => InputFormat::Text,
        Err(_) => InputFormat::Binary,
    }
}

/// Detect the input format of a file.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(detect_format_from_bytes(&header))
}

/// Check if bytes are readable as text.
pub fn is_text_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_text()
}
