//! Document-level types.

use super::{ClassifiedLine, LineType, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A processed document: the section tree plus the analyzed line list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Root of the section tree
    pub root: Section,

    /// Classified input lines, for diagnostic inspection
    pub lines: Vec<ClassifiedLine>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            root: Section::root(),
            lines: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Whether the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of sections below the root.
    pub fn section_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Title: explicit metadata title, else the first heading.
    pub fn title(&self) -> Option<String> {
        self.metadata
            .title
            .clone()
            .or_else(|| self.root.children.first().and_then(|s| s.display_heading()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Source name (file path or caller-supplied label)
    pub source: Option<String>,

    /// Total word count of the input
    pub word_count: usize,

    /// Total input line count
    pub line_count: usize,

    /// Short-document verdict
    pub is_short: bool,

    /// Human-readable reason for the verdict
    pub short_reason: String,

    /// Whether heading numbers were synthesized for this document
    pub numbering_synthesized: bool,

    /// Processing timestamp
    pub processed_at: DateTime<Utc>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            source: None,
            word_count: 0,
            line_count: 0,
            is_short: true,
            short_reason: String::new(),
            numbering_synthesized: false,
            processed_at: Utc::now(),
        }
    }
}

impl Metadata {
    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(ref title) = self.title {
            lines.push(format!("title: \"{}\"", escape_yaml(title)));
        }
        if let Some(ref source) = self.source {
            lines.push(format!("source: \"{}\"", escape_yaml(source)));
        }
        lines.push(format!("words: {}", self.word_count));
        lines.push(format!("short_document: {}", self.is_short));
        lines.push(format!("processed: {}", self.processed_at.to_rfc3339()));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Statistics collected while processing a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Line count per classified type
    pub line_types: BTreeMap<LineType, u32>,

    /// Sections opened (headings)
    pub section_count: u32,

    /// Headings whose number came from the source
    pub existing_numbers: u32,

    /// Headings whose number was synthesized
    pub synthesized_numbers: u32,

    /// Lists kept as list constructs
    pub lists_retained: u32,

    /// Bullet runs collapsed to paragraphs
    pub lists_collapsed: u32,

    /// Paragraph blocks
    pub paragraph_count: u32,

    /// Table blocks
    pub table_count: u32,

    /// Forced page breaks inserted before headings
    pub forced_page_breaks: u32,

    /// Explicit page breaks from the source
    pub explicit_page_breaks: u32,

    /// Forced page breaks suppressed (collapse rule or short document)
    pub suppressed_page_breaks: u32,

    /// Total word count
    pub word_count: u32,
}

impl ProcessingStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified line.
    pub fn add_line(&mut self, line_type: LineType) {
        *self.line_types.entry(line_type).or_insert(0) += 1;
    }

    /// Number of lines of the given type.
    pub fn lines_of(&self, line_type: LineType) -> u32 {
        self.line_types.get(&line_type).copied().unwrap_or(0)
    }

    /// Total page breaks in the output.
    pub fn page_breaks(&self) -> u32 {
        self.forced_page_breaks + self.explicit_page_breaks
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ProcessingStats) {
        for (line_type, count) in &other.line_types {
            *self.line_types.entry(*line_type).or_insert(0) += count;
        }
        self.section_count += other.section_count;
        self.existing_numbers += other.existing_numbers;
        self.synthesized_numbers += other.synthesized_numbers;
        self.lists_retained += other.lists_retained;
        self.lists_collapsed += other.lists_collapsed;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.forced_page_breaks += other.forced_page_breaks;
        self.explicit_page_breaks += other.explicit_page_breaks;
        self.suppressed_page_breaks += other.suppressed_page_breaks;
        self.word_count += other.word_count;
    }
}
