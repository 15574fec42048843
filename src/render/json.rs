//! JSON rendering for processed documents.

use crate::error::{Error, Result};
use crate::model::{ClassifiedLine, Document};
use serde::Serialize;

use super::layout::RenderedDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a document (metadata, section tree, analyzed lines, statistics)
/// to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Convert the analyzed line list to JSON.
pub fn lines_to_json(lines: &[ClassifiedLine], format: JsonFormat) -> Result<String> {
    serialize(lines, format)
}

/// Convert a rendered block stream to JSON for an external document writer.
pub fn layout_to_json(rendered: &RenderedDocument, format: JsonFormat) -> Result<String> {
    serialize(rendered, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Paragraph, Section};
    use crate::render::{render, RenderOptions};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());
        let mut section = Section::new("Overview", 1);
        section.push(ContentBlock::Paragraph(Paragraph::new("Hello")));
        doc.root.children.push(section);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"heading\": \"Overview\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root"]["children"][0]["content"][0]["type"], "paragraph");
    }

    #[test]
    fn test_layout_to_json() {
        let doc = sample();
        let rendered = render(&doc.root, &RenderOptions::default(), true);
        let json = layout_to_json(&rendered, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["page"]["font_family"], "Times New Roman");
        assert_eq!(value["blocks"][0]["type"], "heading");
    }
}
