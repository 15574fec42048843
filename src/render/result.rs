//! Rendering result with metadata and statistics.

use crate::model::{Metadata, ProcessingStats};
use serde::{Deserialize, Serialize};

/// Rendered content together with the statistics of the run that built it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Processing statistics
    pub stats: ProcessingStats,

    /// Output size
    pub output: OutputCounts,
}

impl RenderResult {
    /// Create a new render result, counting the output text.
    pub fn new(content: String, metadata: Metadata, stats: ProcessingStats) -> Self {
        let output = OutputCounts::of(&content);
        Self {
            content,
            metadata,
            stats,
            output,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Word and character counts of rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCounts {
    /// Whitespace-separated tokens
    pub words: u32,
    /// Non-whitespace characters
    pub chars: u32,
}

impl OutputCounts {
    /// Count the given text.
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        counts.count_text(text);
        counts
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.words += text.split_whitespace().count() as u32;
        self.chars += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
