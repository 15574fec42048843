//! Classified line types produced by the line classifier.

use super::NumberingToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline emphasis style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
    /// `***text***`
    BoldItalic,
}

impl EmphasisStyle {
    /// Whether the style includes bold.
    pub fn is_bold(self) -> bool {
        matches!(self, EmphasisStyle::Bold | EmphasisStyle::BoldItalic)
    }

    /// Whether the style includes italic.
    pub fn is_italic(self) -> bool {
        matches!(self, EmphasisStyle::Italic | EmphasisStyle::BoldItalic)
    }
}

/// An emphasized range of a line's stored (marker-free) text.
///
/// Offsets are byte offsets into the text they were extracted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasisSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Emphasis style
    pub style: EmphasisStyle,
}

impl EmphasisSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, style: EmphasisStyle) -> Self {
        Self { start, end, style }
    }

    /// Shift the span left by `offset` bytes, dropping it if it falls
    /// entirely before the cut.
    pub fn rebase(self, offset: usize) -> Option<Self> {
        if self.end <= offset {
            return None;
        }
        Some(Self {
            start: self.start.saturating_sub(offset),
            end: self.end - offset,
            style: self.style,
        })
    }
}

/// Shift a set of spans to account for a prefix of `offset` bytes being cut
/// from the text they belong to.
pub fn rebase_spans(spans: &[EmphasisSpan], offset: usize) -> Vec<EmphasisSpan> {
    spans.iter().filter_map(|s| s.rebase(offset)).collect()
}

/// Chapter label carried by a heading line ("CHAPTER ONE", "Chapter 2: Scope").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterLabel {
    /// Chapter number
    pub number: u32,
    /// Whether a title follows the label on the same line
    pub titled: bool,
}

/// Caption kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionKind {
    /// "Table 3: ..."
    Table,
    /// "Figure 2 ...", "Fig. 1 ..."
    Figure,
}

/// Semantic type of a line, carrying the fields guaranteed for that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineClass {
    /// Unnumbered heading.
    Heading {
        /// Depth implied by the line itself (markdown hashes, keywords)
        depth_hint: Option<u8>,
        /// Matches a structural keyword
        keyword: bool,
        /// Chapter label, if the heading is one
        chapter: Option<ChapterLabel>,
    },
    /// Heading that already carries a visible number.
    NumberedHeading {
        /// Existing number
        number: NumberingToken,
    },
    /// Arabic or roman numbered list item.
    NumberedListItem {
        /// Existing number
        number: NumberingToken,
    },
    /// Bullet list item.
    BulletListItem {
        /// Bullet character found in the source
        marker: char,
    },
    /// Lettered list item (`a)`, `B.`).
    LetteredListItem {
        /// Existing letter
        number: NumberingToken,
    },
    /// Table row.
    TableRow {
        /// Cell texts
        cells: Vec<String>,
        /// Column start positions (character offsets); empty for pipe rows
        columns: Vec<usize>,
        /// Markdown separator row (`|---|:--|`)
        separator: bool,
    },
    /// Horizontal rule (`---`, `***`).
    SectionBreak,
    /// Explicit page break (form feed or `[PAGE BREAK]`).
    PageBreak,
    /// Table or figure caption.
    Caption {
        /// Caption kind
        kind: CaptionKind,
    },
    /// Ordinary prose.
    Paragraph,
    /// Empty line.
    Blank,
}

/// Flat line type, used for statistics and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Heading,
    NumberedHeading,
    NumberedListItem,
    BulletListItem,
    LetteredListItem,
    TableRow,
    SectionBreak,
    PageBreak,
    Caption,
    Paragraph,
    Blank,
}

impl LineType {
    /// Snake-case name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            LineType::Heading => "heading",
            LineType::NumberedHeading => "numbered_heading",
            LineType::NumberedListItem => "numbered_list_item",
            LineType::BulletListItem => "bullet_list_item",
            LineType::LetteredListItem => "lettered_list_item",
            LineType::TableRow => "table_row",
            LineType::SectionBreak => "section_break",
            LineType::PageBreak => "page_break",
            LineType::Caption => "caption",
            LineType::Paragraph => "paragraph",
            LineType::Blank => "blank",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LineClass {
    /// Flat type of this class.
    pub fn line_type(&self) -> LineType {
        match self {
            LineClass::Heading { .. } => LineType::Heading,
            LineClass::NumberedHeading { .. } => LineType::NumberedHeading,
            LineClass::NumberedListItem { .. } => LineType::NumberedListItem,
            LineClass::BulletListItem { .. } => LineType::BulletListItem,
            LineClass::LetteredListItem { .. } => LineType::LetteredListItem,
            LineClass::TableRow { .. } => LineType::TableRow,
            LineClass::SectionBreak => LineType::SectionBreak,
            LineClass::PageBreak => LineType::PageBreak,
            LineClass::Caption { .. } => LineType::Caption,
            LineClass::Paragraph => LineType::Paragraph,
            LineClass::Blank => LineType::Blank,
        }
    }

    /// Whether the line opens a section.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            LineClass::Heading { .. } | LineClass::NumberedHeading { .. }
        )
    }

    /// Whether the line is a list item of any kind.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            LineClass::NumberedListItem { .. }
                | LineClass::BulletListItem { .. }
                | LineClass::LetteredListItem { .. }
        )
    }

    /// Numbering token carried by the line, if any.
    pub fn number(&self) -> Option<&NumberingToken> {
        match self {
            LineClass::NumberedHeading { number }
            | LineClass::NumberedListItem { number }
            | LineClass::LetteredListItem { number } => Some(number),
            _ => None,
        }
    }
}

/// One input line after classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// Zero-based line index in the input
    pub index: usize,

    /// Line as it appeared in the input
    pub raw: String,

    /// Content text: emphasis markers removed and, for headings and list
    /// items, the numbering token or bullet marker removed
    pub text: String,

    /// Semantic type and its per-type fields
    #[serde(flatten)]
    pub class: LineClass,

    /// Confidence of the classification (0.0 - 1.0)
    pub confidence: f32,

    /// Emphasis spans over `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emphasis: Vec<EmphasisSpan>,

    /// Leading whitespace width of the raw line
    #[serde(default)]
    pub indent: usize,

    /// Name of the rule that produced the classification
    pub rule: String,
}

impl ClassifiedLine {
    /// Flat type of the line.
    pub fn line_type(&self) -> LineType {
        self.class.line_type()
    }

    /// Number of whitespace-separated words in the content text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the line is blank.
    pub fn is_blank(&self) -> bool {
        matches!(self.class, LineClass::Blank)
    }
}
