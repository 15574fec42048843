//! Markdown rendering for processed documents.
//!
//! The output is meant to be fed back through the processor unchanged:
//! numbered headings and items keep their literal numbers, page breaks are
//! written as a marker line the classifier recognizes, and captions are not
//! wrapped in bold so they do not read as headings.

use crate::error::Result;
use crate::model::{
    rebase_spans, CaptionKind, ContentBlock, Document, EmphasisSpan, ListBlock, ListKind,
    Paragraph, ParagraphRole, Section, TableBlock,
};

use super::layout::{styled_runs, Run};
use super::{RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let content = to_markdown(doc, options)?;
    Ok(RenderResult::new(content, doc.metadata.clone(), doc.stats.clone()))
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    blocks: Vec<String>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
        }

        if self.options.include_toc {
            self.render_toc(&doc.root, doc.metadata.is_short);
        }
        self.render_section(&doc.root);

        output.push_str(&self.blocks.join("\n\n"));
        let mut output = output.trim().to_string();
        if !output.is_empty() {
            output.push('\n');
        }
        Ok(output)
    }

    fn render_toc(&mut self, root: &Section, is_short: bool) {
        let outline = root.outline();
        if outline.is_empty() {
            return;
        }
        self.blocks.push(format!("**{}**", self.options.toc_title));
        let entries: Vec<String> = outline
            .iter()
            .map(|e| {
                let indent = "  ".repeat(e.depth.saturating_sub(1) as usize);
                format!("{}- {}", indent, e.title)
            })
            .collect();
        self.blocks.push(entries.join("\n"));
        if !is_short {
            self.blocks.push(self.options.page_break_marker.clone());
        }
    }

    fn render_section(&mut self, section: &Section) {
        if let Some(heading) = section.display_heading() {
            let hashes = "#".repeat(section.level.clamp(1, 6) as usize);
            self.blocks.push(format!("{} {}", hashes, heading));
            if let Some(subtitle) = &section.subtitle {
                self.blocks.push(format!("{} {}", hashes, subtitle));
            }
        }

        for block in &section.content {
            match block {
                ContentBlock::Paragraph(paragraph) => {
                    let rendered = self.render_paragraph(paragraph);
                    self.blocks.push(rendered);
                }
                ContentBlock::List(list) => {
                    let rendered = self.render_list(list);
                    self.blocks.push(rendered);
                }
                ContentBlock::Table(table) => self.blocks.push(render_table(table)),
                ContentBlock::PageBreak => {
                    self.blocks.push(self.options.page_break_marker.clone());
                }
                ContentBlock::SectionBreak => self.blocks.push("---".to_string()),
            }
        }

        for child in &section.children {
            self.render_section(child);
        }
    }

    fn render_paragraph(&self, paragraph: &Paragraph) -> String {
        let mut output = String::new();
        if let Some(marker) = &paragraph.marker {
            output.push_str(marker);
            output.push(' ');
        }

        let text = &paragraph.text;
        match paragraph.role {
            ParagraphRole::Caption(CaptionKind::Table) => output.push_str(text),
            ParagraphRole::Caption(CaptionKind::Figure) => {
                output.push_str(&emphasize(&Run::italic(text.as_str())));
            }
            ParagraphRole::Definition(term_len) if text.is_char_boundary(term_len) => {
                output.push_str(&emphasize(&Run::bold(&text[..term_len])));
                output.push_str(&inline_markdown(
                    &text[term_len..],
                    &rebase_spans(&paragraph.emphasis, term_len),
                ));
            }
            _ => output.push_str(&inline_markdown(text, &paragraph.emphasis)),
        }
        output
    }

    fn render_list(&self, list: &ListBlock) -> String {
        list.items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let text = inline_markdown(&item.text, &item.emphasis);
                match (&item.number, list.kind) {
                    // Literal label, never a Markdown ordered list
                    (Some(number), _) => format!("**{}** {}", number.raw, text),
                    (None, ListKind::Bullet) => format!("- {}", text),
                    (None, _) => format!("{}. {}", i + 1, text),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render text with emphasis spans as Markdown.
pub fn inline_markdown(text: &str, spans: &[EmphasisSpan]) -> String {
    styled_runs(text, spans).iter().map(emphasize).collect()
}

/// Wrap a run in emphasis markers, keeping surrounding whitespace outside.
fn emphasize(run: &Run) -> String {
    let marker = match (run.bold, run.italic) {
        (true, true) => "***",
        (true, false) => "**",
        (false, true) => "*",
        (false, false) => return run.text.clone(),
    };
    let core = run.text.trim();
    if core.is_empty() {
        return run.text.clone();
    }
    let lead = &run.text[..run.text.len() - run.text.trim_start().len()];
    let trail = &run.text[run.text.trim_end().len()..];
    format!("{}{}{}{}{}", lead, marker, core, marker, trail)
}

fn render_table(table: &TableBlock) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.replace('\n', " ")).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 && table.header {
            lines.push(format!("|{}|", vec!["---"; table.columns.max(1)].join("|")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmphasisStyle, ListItem, NumberingKind, NumberingToken};

    fn doc_with(root: Section) -> Document {
        let mut doc = Document::new();
        doc.root = root;
        doc
    }

    #[test]
    fn test_render_heading_with_number() {
        let mut root = Section::root();
        root.children.push(
            Section::new("Introduction", 1).with_number(NumberingToken::synthesized(vec![1]), true),
        );
        let md = to_markdown(&doc_with(root), &RenderOptions::default()).unwrap();
        assert_eq!(md, "# 1. Introduction\n");
    }

    #[test]
    fn test_numbered_item_has_single_label() {
        let mut list = ListBlock::new(ListKind::Numbered);
        let mut item = ListItem::new("Implications for Students");
        item.number = Some(NumberingToken::new(NumberingKind::Roman, vec![1], "I."));
        list.items.push(item);
        let mut root = Section::root();
        root.push(ContentBlock::List(list));

        let md = to_markdown(&doc_with(root), &RenderOptions::default()).unwrap();
        assert_eq!(md.trim(), "**I.** Implications for Students");
    }

    #[test]
    fn test_render_table_with_header() {
        let table = TableBlock::new(
            vec![
                vec!["Name".into(), "Age".into()],
                vec!["Ann".into(), "31".into()],
            ],
            true,
        );
        assert_eq!(render_table(&table), "| Name | Age |\n|---|---|\n| Ann | 31 |");
    }

    #[test]
    fn test_page_break_marker() {
        let mut root = Section::root();
        root.push(ContentBlock::Paragraph(Paragraph::new("One.")));
        root.push(ContentBlock::PageBreak);
        root.push(ContentBlock::Paragraph(Paragraph::new("Two.")));
        let md = to_markdown(&doc_with(root), &RenderOptions::default()).unwrap();
        assert_eq!(md, "One.\n\n[PAGE BREAK]\n\nTwo.\n");
    }

    #[test]
    fn test_inline_markdown() {
        let spans = vec![EmphasisSpan::new(2, 7, EmphasisStyle::Bold)];
        assert_eq!(inline_markdown("A bold  word", &spans), "A **bold**  word");
    }

    #[test]
    fn test_render_with_frontmatter() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Report".to_string());
        let md = to_markdown(&doc, &RenderOptions::default().with_frontmatter(true)).unwrap();
        assert!(md.starts_with("---\ntitle: \"Report\""));
    }
}
