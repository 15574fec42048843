//! # prosemark
//!
//! Structure inference for unstructured prose.
//!
//! Raw text (a thesis, a report, pasted notes) goes in; a section tree with
//! consistent heading numbering, retained or collapsed lists, tables and
//! page breaks comes out, ready to render as Markdown, plain text, JSON, or
//! a styled block stream for a document writer.
//!
//! ## Quick Start
//!
//! ```
//! use prosemark::{process_text, render};
//!
//! fn main() -> prosemark::Result<()> {
//!     let doc = process_text("INTRODUCTION\nThis study examines...\n");
//!
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     assert!(markdown.starts_with("# INTRODUCTION"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line classification**: ordered rule table with explicit confidence
//! - **Heading numbering**: existing numbers kept verbatim, missing ones
//!   synthesized hierarchically, never numbered twice
//! - **List retention**: terse bullet runs stay lists, prose-like runs
//!   become paragraphs
//! - **Tables**: pipe rows and whitespace-aligned columns
//! - **Page breaks**: before structural headings, collapsed, skipped for
//!   short documents
//! - **Parallel batches**: independent documents processed with Rayon

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, DocumentReader, DocumentWriter, OutputFormat, ReaderRegistry,
    SourceBlock, SourceDocument,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use model::{
    ClassifiedLine, ContentBlock, Document, LineClass, LineType, ListBlock, ListItem, Metadata,
    NumberingKind, NumberingToken, Paragraph, ProcessingStats, Section, TableBlock,
};
pub use parser::{
    CleanupPreset, DocumentProcessor, LineClassifier, ListRetention, NumberingPolicy,
    ParseOptions,
};
pub use render::{FormatOptions, JsonFormat, RenderOptions, RenderedDocument};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Process text with default options.
///
/// # Example
///
/// ```
/// use prosemark::process_text;
///
/// let doc = process_text("I. Implications for Students\nThey benefit.");
/// let heading = doc.root.children[0].display_heading();
/// assert_eq!(heading.as_deref(), Some("I. Implications for Students"));
/// ```
pub fn process_text(text: &str) -> Document {
    DocumentProcessor::new().process(text)
}

/// Process text with custom options.
pub fn process_text_with_options(text: &str, options: ParseOptions) -> Document {
    DocumentProcessor::with_options(options).process(text)
}

/// Classify every line of the text without building structure.
///
/// Useful for inspecting why a line was treated as a heading, list item or
/// table row.
pub fn analyze_text(text: &str, options: &ParseOptions) -> Vec<ClassifiedLine> {
    process_text_with_options(text, options.clone()).lines
}

/// Read and process a file.
///
/// # Example
///
/// ```no_run
/// use prosemark::parse_file;
///
/// let doc = parse_file("thesis.txt").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Read and process a file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let source = ReaderRegistry::with_defaults().read_path(path)?;
    Ok(process_source(&source, path, options))
}

/// Process bytes; anything that is not UTF-8 text is rejected.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let source = ReaderRegistry::with_defaults().read_bytes(data, "txt")?;
    Ok(process_text(&source.to_text()))
}

/// Read and process a file asynchronously.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("txt");
    let source = ReaderRegistry::with_defaults().read_bytes(&bytes, ext)?;
    Ok(process_source(&source, path, options))
}

fn process_source(source: &SourceDocument, path: &Path, mut options: ParseOptions) -> Document {
    if options.source.is_none() {
        options.source = Some(path.display().to_string());
    }
    if options.title.is_none() {
        options.title = source.title.clone().or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        });
    }
    process_text_with_options(&source.to_text(), options)
}

/// Convert a file to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert a file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, &RenderOptions::default())
}

/// Convert a file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Format text to Markdown using a request-layer options record.
///
/// # Example
///
/// ```
/// use prosemark::{format_text, FormatOptions};
///
/// let options = FormatOptions { include_toc: true, ..Default::default() };
/// let markdown = format_text("Overview\nText.", &options).unwrap();
/// assert!(markdown.contains("Text."));
/// ```
pub fn format_text(text: &str, options: &FormatOptions) -> Result<String> {
    let (parse, render) = options.into_options()?;
    let doc = process_text_with_options(text, parse);
    render::to_markdown(&doc, &render)
}

/// Process independent documents in parallel.
///
/// Each document runs with its own pipeline state; the output order matches
/// the input order.
pub fn process_batch<S>(texts: &[S], options: &ParseOptions) -> Vec<Document>
where
    S: AsRef<str> + Sync,
{
    let processor = DocumentProcessor::with_options(options.clone());
    texts
        .par_iter()
        .map(|text| processor.process(text.as_ref()))
        .collect()
}

/// Read and process files in parallel, keeping per-file errors.
pub fn process_files<P>(paths: &[P], options: &ParseOptions) -> Vec<(PathBuf, Result<Document>)>
where
    P: AsRef<Path> + Sync,
{
    process_files_with_progress(paths, options, |_| {})
}

/// Like [`process_files`], calling `on_done` as each file finishes.
pub fn process_files_with_progress<P, F>(
    paths: &[P],
    options: &ParseOptions,
    on_done: F,
) -> Vec<(PathBuf, Result<Document>)>
where
    P: AsRef<Path> + Sync,
    F: Fn(&Path) + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = parse_file_with_options(path, options.clone());
            on_done(path);
            (path.to_path_buf(), result)
        })
        .collect()
}

/// Builder for processing and rendering documents.
///
/// # Example
///
/// ```no_run
/// use prosemark::{NumberingPolicy, Prosemark};
///
/// let markdown = Prosemark::new()
///     .with_numbering(NumberingPolicy::Always)
///     .with_toc()
///     .with_frontmatter()
///     .parse("thesis.txt")?
///     .to_markdown()?;
/// # Ok::<(), prosemark::Error>(())
/// ```
pub struct Prosemark {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Prosemark {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Apply a request-layer options record.
    pub fn with_format_options(mut self, options: &FormatOptions) -> Result<Self> {
        let (parse, render) = options.apply(self.parse_options, self.render_options)?;
        self.parse_options = parse;
        self.render_options = render;
        Ok(self)
    }

    /// Set the numbering policy.
    pub fn with_numbering(mut self, policy: NumberingPolicy) -> Self {
        self.parse_options = self.parse_options.with_numbering(policy);
        self
    }

    /// Disable forced page breaks.
    pub fn without_page_breaks(mut self) -> Self {
        self.parse_options = self.parse_options.with_page_breaks(false);
        self
    }

    /// Set the cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.parse_options = self.parse_options.with_cleanup(preset);
        self
    }

    /// Include a table of contents.
    pub fn with_toc(mut self) -> Self {
        self.render_options = self.render_options.with_toc(true);
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Read and process a file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ProsemarkResult> {
        let document = parse_file_with_options(path, self.parse_options)?;
        Ok(ProsemarkResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Process text.
    pub fn process(self, text: &str) -> ProsemarkResult {
        ProsemarkResult {
            document: process_text_with_options(text, self.parse_options),
            render_options: self.render_options,
        }
    }
}

impl Default for Prosemark {
    fn default() -> Self {
        Self::new()
    }
}

/// A processed document with the render options to apply.
pub struct ProsemarkResult {
    /// The processed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl ProsemarkResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Render to a styled block stream.
    pub fn to_layout(&self) -> RenderedDocument {
        render::render_document(&self.document, &self.render_options)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
