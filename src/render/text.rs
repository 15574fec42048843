//! Plain text rendering.

use crate::error::Result;
use crate::model::Document;
use unicode_segmentation::UnicodeSegmentation;

use super::layout::{render_document, runs_text, LayoutBlock, ListStyle, RenderedDocument};
use super::RenderOptions;

const TOC_WIDTH: usize = 60;

/// Convert a document to plain text.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(layout_to_text(&render_document(doc, options)))
}

/// Convert a rendered document to plain text.
///
/// Page breaks become form feeds and tables are laid out in aligned
/// columns.
pub fn layout_to_text(rendered: &RenderedDocument) -> String {
    let mut output = String::new();
    let mut previous_item = false;

    for block in &rendered.blocks {
        let is_item = matches!(block, LayoutBlock::ListItem { .. });
        if !output.is_empty() {
            output.push_str(if is_item && previous_item { "\n" } else { "\n\n" });
        }
        previous_item = is_item;

        match block {
            LayoutBlock::Heading { text, .. } => output.push_str(text),
            LayoutBlock::Paragraph { runs, .. } => output.push_str(runs_text(runs).trim_end()),
            LayoutBlock::ListItem {
                style,
                ordinal,
                runs,
            } => {
                let marker = match style {
                    ListStyle::Bullet { marker } => marker.to_string(),
                    ListStyle::AutoNumber { lettered: true } => format!("{}.", letter(*ordinal)),
                    ListStyle::AutoNumber { lettered: false } => format!("{}.", ordinal),
                };
                output.push_str(&format!("{} {}", marker, runs_text(runs)));
            }
            LayoutBlock::Table { rows, header, .. } => {
                output.push_str(&render_table(rows, *header))
            }
            LayoutBlock::TableOfContents { title, entries } => {
                output.push_str(title);
                for entry in entries {
                    let indent = "  ".repeat(entry.depth.saturating_sub(1) as usize);
                    let used = display_width(&indent) + display_width(&entry.title) + 1;
                    let dots = ".".repeat(TOC_WIDTH.saturating_sub(used).max(3));
                    output.push_str(&format!("\n{}{} {}", indent, entry.title, dots));
                }
            }
            LayoutBlock::PageBreak => output.push('\u{000C}'),
            LayoutBlock::SectionBreak => output.push_str("* * *"),
        }
    }

    let mut output = output.trim_end().to_string();
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

fn letter(ordinal: usize) -> char {
    let offset = (ordinal.max(1) - 1) % 26;
    char::from(b'a' + offset as u8)
}

/// Width of text in user-perceived characters.
fn display_width(text: &str) -> usize {
    text.graphemes(true).count()
}

fn render_table(rows: &[Vec<String>], header: bool) -> String {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (r, row) in rows.iter().enumerate() {
        let cells: Vec<String> = (0..columns)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = widths[i] - display_width(cell);
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
        if r == 0 && header {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(1))).collect();
            lines.push(rule.join("  "));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Paragraph, Section};

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        doc.root.push(ContentBlock::Paragraph(Paragraph::new("Hello, world!")));
        doc.root
            .push(ContentBlock::Paragraph(Paragraph::new("Second paragraph.")));
        doc.root.children.push(Section::new("Next", 1));

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result, "Hello, world!\n\nSecond paragraph.\n\nNext\n");
    }

    #[test]
    fn test_table_columns_align() {
        let rows = vec![
            vec!["Name".to_string(), "City".to_string()],
            vec!["Zoë".to_string(), "London".to_string()],
        ];
        assert_eq!(render_table(&rows, true), "Name  City\n----  ------\nZoë   London");
    }

    #[test]
    fn test_page_break_is_form_feed() {
        let mut doc = Document::new();
        doc.root.push(ContentBlock::Paragraph(Paragraph::new("One.")));
        doc.root.push(ContentBlock::PageBreak);
        doc.root.push(ContentBlock::Paragraph(Paragraph::new("Two.")));
        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(text, "One.\n\n\u{000C}\n\nTwo.\n");
    }

    #[test]
    fn test_letter() {
        assert_eq!(letter(1), 'a');
        assert_eq!(letter(3), 'c');
    }
}
