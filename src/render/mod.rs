//! Rendering module for converting section trees to output formats.

mod json;
pub mod layout;
mod markdown;
mod options;
mod result;
mod text;

pub use json::{layout_to_json, lines_to_json, to_json, JsonFormat};
pub use layout::{
    render, render_document, Alignment, LayoutBlock, ListStyle, PageSetup, RenderedDocument, Run,
    TocEntry,
};
pub use markdown::{inline_markdown, to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{default_heading_styles, FormatOptions, HeadingStyle, RenderOptions};
pub use result::{OutputCounts, RenderResult};
pub use text::{layout_to_text, to_text};
