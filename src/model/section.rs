//! Section tree types.

use super::{EmphasisSpan, NumberingToken, CaptionKind};
use serde::{Deserialize, Serialize};

/// Semantic role of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Root or ordinary section
    #[default]
    Body,
    /// Chapter label heading ("CHAPTER ONE")
    Chapter,
    /// Reference list (REFERENCES, BIBLIOGRAPHY, WORKS CITED)
    References,
}

/// A node of the section tree. The root has no heading and level 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text without its number
    pub heading: Option<String>,

    /// Hierarchical depth (0 = root)
    pub level: u8,

    /// Number shown with the heading, existing or synthesized
    pub number: Option<NumberingToken>,

    /// Whether `number` was synthesized rather than found in the source
    #[serde(default)]
    pub was_renumbered: bool,

    /// Title line following an untitled chapter label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Semantic role
    #[serde(default)]
    pub kind: SectionKind,

    /// Ordered content blocks
    pub content: Vec<ContentBlock>,

    /// Ordered subsections
    pub children: Vec<Section>,
}

impl Section {
    /// Create the root section.
    pub fn root() -> Self {
        Self {
            heading: None,
            level: 0,
            number: None,
            was_renumbered: false,
            subtitle: None,
            kind: SectionKind::Body,
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a section for a heading.
    pub fn new(heading: impl Into<String>, level: u8) -> Self {
        Self {
            heading: Some(heading.into()),
            level,
            ..Self::root()
        }
    }

    /// Set the number.
    pub fn with_number(mut self, number: NumberingToken, was_renumbered: bool) -> Self {
        self.number = Some(number);
        self.was_renumbered = was_renumbered;
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: SectionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the root section.
    pub fn is_root(&self) -> bool {
        self.level == 0 && self.heading.is_none()
    }

    /// Heading as displayed: number label followed by the heading text.
    pub fn display_heading(&self) -> Option<String> {
        let heading = self.heading.as_deref()?;
        Some(match &self.number {
            Some(number) if heading.is_empty() => number.raw.clone(),
            Some(number) => format!("{} {}", number.raw, heading),
            None => heading.to_string(),
        })
    }

    /// Heading with subtitle appended, used for outlines.
    pub fn outline_title(&self) -> Option<String> {
        let heading = self.display_heading()?;
        Some(match &self.subtitle {
            Some(subtitle) => format!("{}: {}", heading, subtitle),
            None => heading,
        })
    }

    /// Whether the section has neither content nor subsections.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.is_empty()
    }

    /// Append a content block.
    pub fn push(&mut self, block: ContentBlock) {
        self.content.push(block);
    }

    /// Last content block, if any.
    pub fn last_block(&self) -> Option<&ContentBlock> {
        self.content.last()
    }

    /// Total number of sections below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Flatten the tree into outline entries, depth-first.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        self.collect_outline(&mut entries);
        entries
    }

    fn collect_outline(&self, entries: &mut Vec<OutlineEntry>) {
        if let Some(title) = self.outline_title() {
            entries.push(OutlineEntry {
                depth: self.level,
                title,
            });
        }
        for child in &self.children {
            child.collect_outline(entries);
        }
    }

    /// Visit this section and every descendant, depth-first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Section)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::root()
    }
}

/// A (depth, heading) pair in the flattened section tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Section depth (1 = top level)
    pub depth: u8,
    /// Displayed heading, number included
    pub title: String,
}

/// A block of content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Prose paragraph
    Paragraph(Paragraph),
    /// Retained list
    List(ListBlock),
    /// Table
    Table(TableBlock),
    /// Horizontal rule from the source
    SectionBreak,
    /// Forced or explicit page break
    PageBreak,
}

impl ContentBlock {
    /// Whether the block is a page break marker.
    pub fn is_page_break(&self) -> bool {
        matches!(self, ContentBlock::PageBreak)
    }
}

/// Role of a paragraph, driving its rendered style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    /// Ordinary body text
    #[default]
    Body,
    /// Entry of a reference list
    Reference,
    /// Table or figure caption
    Caption(CaptionKind),
    /// "Term: description" paragraph; the value is the byte length of the term
    Definition(usize),
}

/// A paragraph of prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text without emphasis markers
    pub text: String,

    /// Emphasis spans over `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emphasis: Vec<EmphasisSpan>,

    /// Literal marker kept from a collapsed list item ("•", "-")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Rendering role
    #[serde(default)]
    pub role: ParagraphRole,
}

impl Paragraph {
    /// Create a body paragraph.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: Vec::new(),
            marker: None,
            role: ParagraphRole::Body,
        }
    }

    /// Set emphasis spans.
    pub fn with_emphasis(mut self, emphasis: Vec<EmphasisSpan>) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: ParagraphRole) -> Self {
        self.role = role;
        self
    }

    /// Set a literal leading marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Text with the literal marker prepended.
    pub fn display_text(&self) -> String {
        match &self.marker {
            Some(marker) => format!("{} {}", marker, self.text),
            None => self.text.clone(),
        }
    }
}

/// Kind of items a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Bullet items
    Bullet,
    /// Arabic or roman numbered items
    Numbered,
    /// Lettered items
    Lettered,
}

/// A list retained as a list construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    /// Ordered list
    pub ordered: bool,
    /// Item kind
    pub kind: ListKind,
    /// Items in source order
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Create an empty list of the given kind.
    pub fn new(kind: ListKind) -> Self {
        Self {
            ordered: kind != ListKind::Bullet,
            kind,
            items: Vec::new(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An item of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Visible number from the source, if any
    pub number: Option<NumberingToken>,

    /// Bullet character from the source, for bullet items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<char>,

    /// Item text without its marker
    pub text: String,

    /// Emphasis spans over `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emphasis: Vec<EmphasisSpan>,
}

impl ListItem {
    /// Create an item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            number: None,
            marker: None,
            text: text.into(),
            emphasis: Vec::new(),
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Append a continuation line to the item text.
    pub fn append(&mut self, text: &str, emphasis: &[EmphasisSpan]) {
        let offset = self.text.len() + 1;
        self.text.push(' ');
        self.text.push_str(text);
        self.emphasis.extend(emphasis.iter().map(|s| EmphasisSpan {
            start: s.start + offset,
            end: s.end + offset,
            style: s.style,
        }));
    }
}

/// A table of cell texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Rows of cell text, all padded to `columns` cells
    pub rows: Vec<Vec<String>>,
    /// Row 0 is a header (the source had a markdown separator row)
    pub header: bool,
    /// Column count
    pub columns: usize,
}

impl TableBlock {
    /// Build a table, padding short rows with empty cells.
    pub fn new(mut rows: Vec<Vec<String>>, header: bool) -> Self {
        let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }
        Self {
            rows,
            header,
            columns,
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
