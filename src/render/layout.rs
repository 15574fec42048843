//! Layout rendering: turns a section tree into a flat stream of styled
//! blocks that a document writer can replay.
//!
//! Headings and list items that carry a visible number are emitted as
//! literal text. Only items without a number use a list style, so the output
//! format never adds a counter in front of an existing one.

use crate::model::{
    rebase_spans, CaptionKind, ContentBlock, Document, EmphasisSpan, ListBlock, ListKind,
    Paragraph, ParagraphRole, Section, TableBlock,
};
use serde::{Deserialize, Serialize};

use super::options::{HeadingStyle, RenderOptions};

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Left-aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Justified
    Justify,
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Text content
    pub text: String,
    /// Bold weight
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    /// Italic
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Run {
    /// Create a plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// Split text into runs at its emphasis spans.
pub fn styled_runs(text: &str, spans: &[EmphasisSpan]) -> Vec<Run> {
    let mut spans: Vec<EmphasisSpan> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= text.len())
        .filter(|s| text.is_char_boundary(s.start) && text.is_char_boundary(s.end))
        .copied()
        .collect();
    spans.sort_by_key(|s| s.start);

    let mut runs = Vec::new();
    let mut pos = 0;
    for span in spans {
        if span.start < pos {
            continue;
        }
        if span.start > pos {
            runs.push(Run::plain(&text[pos..span.start]));
        }
        runs.push(Run {
            text: text[span.start..span.end].to_string(),
            bold: span.style.is_bold(),
            italic: span.style.is_italic(),
        });
        pos = span.end;
    }
    if pos < text.len() {
        runs.push(Run::plain(&text[pos..]));
    }
    runs
}

/// Concatenated text of a run sequence.
pub fn runs_text(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Page geometry and base text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    /// Body font family
    pub font_family: String,
    /// Body font size in points
    pub font_size: f32,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// Margin on every side, in inches
    pub margin_inches: f32,
}

/// Marker style of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListStyle {
    /// Bullet list with the given marker
    Bullet {
        /// Marker character
        marker: char,
    },
    /// Counter generated by the output format
    AutoNumber {
        /// Letters instead of digits
        lettered: bool,
    },
}

/// One entry of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading depth (1 = top level)
    pub depth: u8,
    /// Heading text with its number
    pub title: String,
}

/// A styled block of the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutBlock {
    /// Section heading, number included literally
    Heading {
        /// Depth (1 = top level)
        depth: u8,
        /// Heading text
        text: String,
        /// Visual style
        style: HeadingStyle,
    },
    /// Paragraph of runs
    Paragraph {
        /// Styled runs
        runs: Vec<Run>,
        /// Alignment
        alignment: Alignment,
        /// Hanging indent (reference entries)
        #[serde(default, skip_serializing_if = "is_false")]
        hanging_indent: bool,
    },
    /// Item of a list whose marker the output format generates
    ListItem {
        /// Marker style
        style: ListStyle,
        /// 1-based position in its list
        ordinal: usize,
        /// Styled runs
        runs: Vec<Run>,
    },
    /// Grid of cells
    Table {
        /// Rows of cell text
        rows: Vec<Vec<String>>,
        /// Style row 0 as a header
        header: bool,
        /// Column count
        columns: usize,
    },
    /// Table of contents
    TableOfContents {
        /// Title line
        title: String,
        /// Entries in document order
        entries: Vec<TocEntry>,
    },
    /// Start a new page
    PageBreak,
    /// Thematic break
    SectionBreak,
}

impl LayoutBlock {
    /// Plain text of the block, without styling.
    pub fn plain_text(&self) -> String {
        match self {
            LayoutBlock::Heading { text, .. } => text.clone(),
            LayoutBlock::Paragraph { runs, .. } | LayoutBlock::ListItem { runs, .. } => {
                runs_text(runs)
            }
            LayoutBlock::Table { rows, .. } => rows
                .iter()
                .map(|r| r.join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
            LayoutBlock::TableOfContents { title, entries } => {
                let mut lines = vec![title.clone()];
                lines.extend(entries.iter().map(|e| e.title.clone()));
                lines.join("\n")
            }
            LayoutBlock::PageBreak | LayoutBlock::SectionBreak => String::new(),
        }
    }
}

/// A section tree rendered to styled blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Page geometry and base style
    pub page: PageSetup,
    /// Blocks in reading order
    pub blocks: Vec<LayoutBlock>,
}

impl RenderedDocument {
    /// Number of page breaks.
    pub fn page_break_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, LayoutBlock::PageBreak))
            .count()
    }
}

/// Render a processed document.
pub fn render_document(doc: &Document, options: &RenderOptions) -> RenderedDocument {
    render(&doc.root, options, doc.metadata.is_short)
}

/// Render a section tree depth-first.
pub fn render(root: &Section, options: &RenderOptions, is_short: bool) -> RenderedDocument {
    let mut renderer = LayoutRenderer {
        options,
        blocks: Vec::new(),
    };

    if options.include_toc {
        let entries: Vec<TocEntry> = root
            .outline()
            .into_iter()
            .map(|e| TocEntry {
                depth: e.depth,
                title: e.title,
            })
            .collect();
        if !entries.is_empty() {
            renderer.blocks.push(LayoutBlock::TableOfContents {
                title: options.toc_title.clone(),
                entries,
            });
            if !is_short {
                renderer.blocks.push(LayoutBlock::PageBreak);
            }
        }
    }

    renderer.section(root);

    RenderedDocument {
        page: PageSetup {
            font_family: options.font_family.clone(),
            font_size: options.font_size,
            line_spacing: options.line_spacing,
            margin_inches: options.margin_inches,
        },
        blocks: renderer.blocks,
    }
}

struct LayoutRenderer<'o> {
    options: &'o RenderOptions,
    blocks: Vec<LayoutBlock>,
}

impl LayoutRenderer<'_> {
    fn section(&mut self, section: &Section) {
        if let Some(text) = section.display_heading() {
            let depth = section.level.max(1);
            let style = self.options.heading_style(depth);
            self.blocks.push(LayoutBlock::Heading { depth, text, style });
            if let Some(subtitle) = &section.subtitle {
                self.blocks.push(LayoutBlock::Heading {
                    depth,
                    text: subtitle.clone(),
                    style,
                });
            }
        }

        for block in &section.content {
            self.content(block);
        }
        for child in &section.children {
            self.section(child);
        }
    }

    fn content(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Paragraph(paragraph) => self.paragraph(paragraph),
            ContentBlock::List(list) => self.list(list),
            ContentBlock::Table(table) => self.table(table),
            ContentBlock::PageBreak => self.blocks.push(LayoutBlock::PageBreak),
            ContentBlock::SectionBreak => self.blocks.push(LayoutBlock::SectionBreak),
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let text = &paragraph.text;
        let mut runs = Vec::new();
        if let Some(marker) = &paragraph.marker {
            runs.push(Run::plain(format!("{} ", marker)));
        }

        let (alignment, hanging_indent) = match paragraph.role {
            ParagraphRole::Body => {
                runs.extend(styled_runs(text, &paragraph.emphasis));
                (Alignment::Justify, false)
            }
            ParagraphRole::Reference => {
                runs.extend(styled_runs(text, &paragraph.emphasis));
                (Alignment::Left, true)
            }
            ParagraphRole::Caption(kind) => {
                runs.push(match kind {
                    CaptionKind::Table => Run::bold(text.as_str()),
                    CaptionKind::Figure => Run::italic(text.as_str()),
                });
                (Alignment::Center, false)
            }
            ParagraphRole::Definition(term_len) if text.is_char_boundary(term_len) => {
                runs.push(Run::bold(&text[..term_len]));
                let rest = &text[term_len..];
                runs.extend(styled_runs(rest, &rebase_spans(&paragraph.emphasis, term_len)));
                (Alignment::Justify, false)
            }
            ParagraphRole::Definition(_) => {
                runs.extend(styled_runs(text, &paragraph.emphasis));
                (Alignment::Justify, false)
            }
        };

        self.blocks.push(LayoutBlock::Paragraph {
            runs,
            alignment,
            hanging_indent,
        });
    }

    fn list(&mut self, list: &ListBlock) {
        let style = match list.kind {
            ListKind::Bullet => ListStyle::Bullet {
                marker: self.options.bullet,
            },
            ListKind::Numbered => ListStyle::AutoNumber { lettered: false },
            ListKind::Lettered => ListStyle::AutoNumber { lettered: true },
        };

        for (i, item) in list.items.iter().enumerate() {
            let text_runs = styled_runs(&item.text, &item.emphasis);
            match &item.number {
                Some(number) => {
                    let mut runs = vec![Run::bold(format!("{} ", number.raw))];
                    runs.extend(text_runs);
                    self.blocks.push(LayoutBlock::Paragraph {
                        runs,
                        alignment: Alignment::Left,
                        hanging_indent: false,
                    });
                }
                None => self.blocks.push(LayoutBlock::ListItem {
                    style,
                    ordinal: i + 1,
                    runs: text_runs,
                }),
            }
        }
    }

    fn table(&mut self, table: &TableBlock) {
        self.blocks.push(LayoutBlock::Table {
            rows: table.rows.clone(),
            header: table.header,
            columns: table.columns,
        });
    }
}
