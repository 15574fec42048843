//! Document processing pipeline.
//!
//! Runs cleanup, classification, numbering policy, and structure building
//! in sequence. Every run owns its own state, so a processor can be shared
//! across threads and used for many documents at once.

use crate::model::{Document, Metadata};
use chrono::Utc;

use super::classifier::LineClassifier;
use super::cleanup::CleanupPipeline;
use super::numbering::{should_synthesize, HeadingNumberingState};
use super::options::ParseOptions;
use super::structure::{short_document, StructureBuilder};

/// Processes raw text into a [`Document`].
pub struct DocumentProcessor {
    options: ParseOptions,
    classifier: LineClassifier,
}

impl DocumentProcessor {
    /// Create a processor with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a processor with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        let classifier = LineClassifier::new(&options);
        Self {
            options,
            classifier,
        }
    }

    /// Replace the line classifier.
    pub fn with_classifier(mut self, classifier: LineClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Processing options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Process one document.
    pub fn process(&self, text: &str) -> Document {
        let cleaned = match self.options.cleanup {
            Some(preset) => CleanupPipeline::from_preset(preset).process(text),
            None => text.to_string(),
        };

        let raw_lines = split_lines(&cleaned);
        let lines = self.classifier.classify_lines(&raw_lines);

        let synthesize = should_synthesize(self.options.numbering, &lines);
        log::debug!(
            "numbering policy {:?}: synthesis {}",
            self.options.numbering,
            if synthesize { "enabled" } else { "disabled" }
        );

        let short = short_document(&lines, self.options.short_document_words);
        log::debug!("short document check: {}", short.reason);

        let output = StructureBuilder::new(
            &self.options,
            HeadingNumberingState::new(synthesize),
            short.is_short,
        )
        .build(&lines);

        let mut stats = output.stats;
        for line in &lines {
            stats.add_line(line.line_type());
        }
        stats.word_count = u32::try_from(short.word_count).unwrap_or(u32::MAX);

        let metadata = Metadata {
            title: self.options.title.clone(),
            source: self.options.source.clone(),
            word_count: short.word_count,
            line_count: lines.len(),
            is_short: short.is_short,
            short_reason: short.reason,
            numbering_synthesized: synthesize,
            processed_at: Utc::now(),
        };

        log::info!(
            "processed {}: {} lines, {} sections, {} page breaks, {} words",
            metadata.source.as_deref().unwrap_or("<text>"),
            metadata.line_count,
            stats.section_count,
            stats.page_breaks(),
            metadata.word_count
        );

        Document {
            metadata,
            root: output.root,
            lines,
            stats,
        }
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into lines, giving every form feed a line of its own.
fn split_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_matches([' ', '\t']);
        if !line.contains('\u{000C}') || trimmed.chars().all(|c| c == '\u{000C}') {
            out.push(line.to_string());
            continue;
        }
        let mut pieces = line.split('\u{000C}').peekable();
        while let Some(piece) = pieces.next() {
            if !piece.trim().is_empty() {
                out.push(piece.to_string());
            }
            if pieces.peek().is_some() {
                out.push("\u{000C}".to_string());
            }
        }
    }
    out
}
