//! Reader and writer seams around the processing core.
//!
//! A [`DocumentReader`] turns an input container into a [`SourceDocument`]
//! (ordered paragraphs with optional bold/italic flags plus tables). A
//! [`DocumentWriter`] turns a processed [`Document`] into output. Readers
//! are dispatched by file extension through a [`ReaderRegistry`]; only plain
//! text and Markdown are built in, other containers need a registered
//! reader.
//!
//! # Example
//!
//! ```no_run
//! use prosemark::convert::{ConvertOptions, ReaderRegistry};
//! use std::path::Path;
//!
//! fn main() -> prosemark::Result<()> {
//!     let registry = ReaderRegistry::with_defaults();
//!     let result = registry.convert(Path::new("thesis.txt"), &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod text;
mod writers;

pub use text::TextReader;
pub use writers::{writer_for, JsonWriter, LayoutWriter, MarkdownWriter, TextWriter};

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, ProcessingStats};
use crate::parser::{DocumentProcessor, ParseOptions};
use crate::render::RenderOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A block of a source container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBlock {
    /// Paragraph text with run flags that cover the whole paragraph
    Paragraph {
        /// Text content
        text: String,
        /// Whole paragraph is bold
        bold: bool,
        /// Whole paragraph is italic
        italic: bool,
    },
    /// Embedded table
    Table {
        /// Rows of cell text
        rows: Vec<Vec<String>>,
    },
}

impl SourceBlock {
    /// Create a plain paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        SourceBlock::Paragraph {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// Content read from an input container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    /// Title from container metadata
    pub title: Option<String>,
    /// Blocks in reading order
    pub blocks: Vec<SourceBlock>,
}

impl SourceDocument {
    /// Create an empty source document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block.
    pub fn push(&mut self, block: SourceBlock) {
        self.blocks.push(block);
    }

    /// Flatten into text lines the classifier understands.
    ///
    /// Run flags become emphasis markers and tables become pipe rows with a
    /// header separator after the first row.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                SourceBlock::Paragraph { text, bold, italic } => {
                    let marker = match (bold, italic) {
                        (true, true) => "***",
                        (true, false) => "**",
                        (false, true) => "*",
                        (false, false) => "",
                    };
                    let trimmed = text.trim();
                    if marker.is_empty() || trimmed.is_empty() {
                        lines.push(text.clone());
                    } else {
                        lines.push(format!("{}{}{}", marker, trimmed, marker));
                    }
                }
                SourceBlock::Table { rows } => {
                    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
                    if columns == 0 {
                        continue;
                    }
                    for (i, row) in rows.iter().enumerate() {
                        let cells: Vec<String> =
                            row.iter().map(|c| c.replace(['|', '\n'], " ")).collect();
                        lines.push(format!("| {} |", cells.join(" | ")));
                        if i == 0 && rows.len() > 1 {
                            lines.push(format!("|{}|", vec!["---"; columns].join("|")));
                        }
                    }
                }
            }
        }
        lines
    }

    /// Flatten into newline-joined text.
    pub fn to_text(&self) -> String {
        self.to_lines().join("\n")
    }
}

/// Trait for input container readers.
///
/// Implement this trait to add support for a new input format.
pub trait DocumentReader: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this reader.
    fn name(&self) -> &str;

    /// Read a container from bytes.
    fn read_bytes(&self, bytes: &[u8]) -> Result<SourceDocument>;

    /// Read a container from a file.
    fn read_path(&self, path: &Path) -> Result<SourceDocument> {
        let bytes = std::fs::read(path)?;
        let mut doc = self.read_bytes(&bytes)?;
        if doc.title.is_none() {
            doc.title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string());
        }
        Ok(doc)
    }

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Trait for output writers.
pub trait DocumentWriter: Send + Sync {
    /// Output format produced.
    fn format(&self) -> OutputFormat;

    /// Render a document to a string.
    fn write(&self, doc: &Document, options: &RenderOptions) -> Result<String>;

    /// Render a document into a file.
    fn write_to(&self, doc: &Document, options: &RenderOptions, path: &Path) -> Result<()> {
        let content = self.write(doc, options)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown format
    #[default]
    Markdown,

    /// Plain text
    Text,

    /// JSON section tree and analyzed lines
    Json,

    /// JSON styled block stream for an external document writer
    Layout,
}

impl OutputFormat {
    /// MIME type of the output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Text => "text/plain",
            OutputFormat::Json | OutputFormat::Layout => "application/json",
        }
    }

    /// Conventional file extension of the output.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json | OutputFormat::Layout => "json",
        }
    }

    /// Parse a format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "txt" | "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "layout" => Some(OutputFormat::Layout),
            _ => None,
        }
    }
}

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Processing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set processing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: String,

    /// Document metadata
    pub metadata: Metadata,

    /// Processing statistics
    pub stats: ProcessingStats,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Registry for input readers, keyed by extension and name.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
    by_name: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in text reader.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextReader::new()));
        registry
    }

    /// Register a reader for all its supported extensions.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// All supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.readers.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Read a file with the reader for its extension.
    ///
    /// A file without a registered extension is still read as text when its
    /// content sniffs as text.
    pub fn read_path(&self, path: &Path) -> Result<SourceDocument> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if let Some(reader) = self.get_by_extension(ext) {
            return reader.read_path(path);
        }

        let format = crate::detect::detect_format_from_path(path)?;
        match (format, self.get_by_name("text")) {
            (InputFormat::Text, Some(reader)) => reader.read_path(path),
            _ => Err(Error::UnsupportedFormat(format!(
                "no reader for {} ({})",
                path.display(),
                format
            ))),
        }
    }

    /// Read bytes using the extension to pick the reader.
    pub fn read_bytes(&self, bytes: &[u8], ext: &str) -> Result<SourceDocument> {
        if let Some(reader) = self.get_by_extension(ext) {
            return reader.read_bytes(bytes);
        }
        let format = detect_format_from_bytes(bytes);
        match (format, self.get_by_name("text")) {
            (InputFormat::Text, Some(reader)) => reader.read_bytes(bytes),
            _ => Err(Error::UnsupportedFormat(format!(
                "no reader for .{} ({})",
                ext, format
            ))),
        }
    }

    /// Read, process and write a file.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let source = self.read_path(path)?;
        let mut parse = options.parse.clone();
        if parse.source.is_none() {
            parse.source = Some(path.display().to_string());
        }
        convert_source(&source, parse, options)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Process a source document and write it in the requested format.
pub fn convert_source(
    source: &SourceDocument,
    mut parse: ParseOptions,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    if parse.title.is_none() {
        parse.title = source.title.clone();
    }
    let doc = DocumentProcessor::with_options(parse).process(&source.to_text());
    let writer = writer_for(options.output_format);
    let content = writer.write(&doc, &options.render)?;
    Ok(ConvertResult {
        content,
        metadata: doc.metadata,
        stats: doc.stats,
        mime_type: options.output_format.mime_type(),
    })
}
