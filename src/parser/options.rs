//! Processing options and configuration.

use super::cleanup::CleanupPreset;

/// Structural keywords that start a new top-level part of a document.
pub const DEFAULT_STRUCTURAL_KEYWORDS: &[&str] = &[
    "ABSTRACT",
    "ACKNOWLEDGEMENT",
    "ACKNOWLEDGEMENTS",
    "ACKNOWLEDGMENTS",
    "APPENDIX",
    "APPENDICES",
    "BACKGROUND",
    "BIBLIOGRAPHY",
    "CONCLUSION",
    "CONCLUSIONS",
    "DEDICATION",
    "DISCUSSION",
    "EXECUTIVE SUMMARY",
    "FINDINGS",
    "INTRODUCTION",
    "LITERATURE REVIEW",
    "METHODOLOGY",
    "METHODS",
    "PREFACE",
    "RECOMMENDATIONS",
    "REFERENCES",
    "RESULTS",
    "SUMMARY",
    "TABLE OF CONTENTS",
    "WORKS CITED",
];

/// Headings whose sections hold reference lists.
pub const REFERENCE_KEYWORDS: &[&str] = &["REFERENCES", "BIBLIOGRAPHY", "WORKS CITED"];

/// How headings without an explicit number are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingPolicy {
    /// Synthesize numbers only when no heading carries an explicit number
    /// and the document has at least three headings
    #[default]
    Auto,
    /// Always synthesize numbers for unnumbered headings
    Always,
    /// Never synthesize numbers
    Never,
}

impl NumberingPolicy {
    /// Parse a policy name ("auto", "always", "never").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(NumberingPolicy::Auto),
            "always" | "on" | "true" => Some(NumberingPolicy::Always),
            "never" | "off" | "false" => Some(NumberingPolicy::Never),
            _ => None,
        }
    }
}

/// Thresholds for keeping a bullet run as a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRetention {
    /// Minimum number of items
    pub min_items: usize,
    /// Maximum words per item
    pub max_words: usize,
    /// A colon within this many leading characters disqualifies an item
    pub colon_window: usize,
}

impl Default for ListRetention {
    fn default() -> Self {
        Self {
            min_items: 4,
            max_words: 30,
            colon_window: 50,
        }
    }
}

/// Options for processing a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Input cleanup preset (`None` disables cleanup)
    pub cleanup: Option<CleanupPreset>,

    /// Heading numbering policy
    pub numbering: NumberingPolicy,

    /// Insert forced page breaks before structural headings
    pub page_breaks: bool,

    /// Documents below this word count are short
    pub short_document_words: usize,

    /// List retention thresholds
    pub list_retention: ListRetention,

    /// Structural keywords (upper-case)
    pub keywords: Vec<String>,

    /// Document title, if known from the source container
    pub title: Option<String>,

    /// Source name recorded in metadata
    pub source: Option<String>,
}

impl ParseOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(preset);
        self
    }

    /// Disable input cleanup.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }

    /// Set the numbering policy.
    pub fn with_numbering(mut self, policy: NumberingPolicy) -> Self {
        self.numbering = policy;
        self
    }

    /// Enable or disable forced page breaks.
    pub fn with_page_breaks(mut self, enabled: bool) -> Self {
        self.page_breaks = enabled;
        self
    }

    /// Set the short-document word threshold.
    pub fn with_short_document_words(mut self, words: usize) -> Self {
        self.short_document_words = words;
        self
    }

    /// Set list retention thresholds.
    pub fn with_list_retention(mut self, retention: ListRetention) -> Self {
        self.list_retention = retention;
        self
    }

    /// Replace the structural keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_uppercase())
            .collect();
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the source name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether `text` is a structural keyword (case-insensitive, trailing
    /// colon ignored).
    pub fn is_keyword(&self, text: &str) -> bool {
        let normalized = normalize_keyword(text);
        self.keywords.iter().any(|k| *k == normalized)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            cleanup: Some(CleanupPreset::Standard),
            numbering: NumberingPolicy::Auto,
            page_breaks: true,
            short_document_words: 500,
            list_retention: ListRetention::default(),
            keywords: DEFAULT_STRUCTURAL_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            title: None,
            source: None,
        }
    }
}

/// Upper-case a heading and strip trailing punctuation for keyword lookup.
pub fn normalize_keyword(text: &str) -> String {
    text.trim()
        .trim_end_matches([':', '.'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Whether a heading names a reference list.
pub fn is_reference_heading(text: &str) -> bool {
    let normalized = normalize_keyword(text);
    REFERENCE_KEYWORDS.iter().any(|k| *k == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .without_cleanup()
            .with_numbering(NumberingPolicy::Never)
            .with_page_breaks(false)
            .with_short_document_words(100)
            .with_keywords(["Scope", " overview "]);

        assert!(options.cleanup.is_none());
        assert_eq!(options.numbering, NumberingPolicy::Never);
        assert!(!options.page_breaks);
        assert_eq!(options.short_document_words, 100);
        assert_eq!(options.keywords, vec!["SCOPE", "OVERVIEW"]);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.cleanup, Some(CleanupPreset::Standard));
        assert_eq!(options.short_document_words, 500);
        assert_eq!(options.list_retention.min_items, 4);
        assert!(options.is_keyword("Introduction"));
        assert!(options.is_keyword("LITERATURE  REVIEW:"));
        assert!(!options.is_keyword("Literature"));
    }

    #[test]
    fn test_reference_heading() {
        assert!(is_reference_heading("References"));
        assert!(is_reference_heading("WORKS CITED"));
        assert!(!is_reference_heading("Conclusion"));
    }

    #[test]
    fn test_numbering_policy_parse() {
        assert_eq!(NumberingPolicy::parse("AUTO"), Some(NumberingPolicy::Auto));
        assert_eq!(NumberingPolicy::parse("off"), Some(NumberingPolicy::Never));
        assert_eq!(NumberingPolicy::parse("sometimes"), None);
    }
}
