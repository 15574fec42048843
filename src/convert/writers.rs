//! Built-in output writers.

use crate::error::Result;
use crate::model::Document;
use crate::render::{
    layout_to_json, render_document, to_json, to_markdown, to_text, JsonFormat, RenderOptions,
};

use super::{DocumentWriter, OutputFormat};

/// Writes Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl DocumentWriter for MarkdownWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn write(&self, doc: &Document, options: &RenderOptions) -> Result<String> {
        to_markdown(doc, options)
    }
}

/// Writes plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl DocumentWriter for TextWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn write(&self, doc: &Document, options: &RenderOptions) -> Result<String> {
        to_text(doc, options)
    }
}

/// Writes the document as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter {
    /// Pretty or compact
    pub format: JsonFormat,
}

impl DocumentWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write(&self, doc: &Document, _options: &RenderOptions) -> Result<String> {
        to_json(doc, self.format)
    }
}

/// Writes the styled block stream as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutWriter {
    /// Pretty or compact
    pub format: JsonFormat,
}

impl DocumentWriter for LayoutWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Layout
    }

    fn write(&self, doc: &Document, options: &RenderOptions) -> Result<String> {
        layout_to_json(&render_document(doc, options), self.format)
    }
}

/// Built-in writer for an output format.
pub fn writer_for(format: OutputFormat) -> Box<dyn DocumentWriter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownWriter),
        OutputFormat::Text => Box::new(TextWriter),
        OutputFormat::Json => Box::new(JsonWriter::default()),
        OutputFormat::Layout => Box::new(LayoutWriter::default()),
    }
}
