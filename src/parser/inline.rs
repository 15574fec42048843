//! Inline emphasis extraction and dash normalization.

use crate::model::{EmphasisSpan, EmphasisStyle};
use once_cell::sync::Lazy;
use regex::Regex;

// Longest marker first so `***x***` is not read as italic inside bold.
static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*\*\*([^*\s](?:[^*]*[^*\s])?)\*\*\*|\*\*([^*\s](?:[^*]*[^*\s])?)\*\*|\*([^*\s](?:[^*]*[^*\s])?)\*",
    )
    .unwrap()
});

static DOUBLE_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)( ?)--( ?)(\w)").unwrap());

/// Text with emphasis markers removed, plus the spans they marked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineText {
    /// Marker-free text
    pub text: String,
    /// Emphasis spans over `text`
    pub spans: Vec<EmphasisSpan>,
}

impl InlineText {
    /// Whether a single span covers the whole text.
    pub fn fully_wrapped(&self) -> Option<EmphasisStyle> {
        match self.spans.as_slice() {
            [span] if span.start == 0 && span.end == self.text.len() && !self.text.is_empty() => {
                Some(span.style)
            }
            _ => None,
        }
    }
}

/// Extract `***bold italic***`, `**bold**` and `*italic*` spans.
///
/// Markers without a matching partner are kept as literal characters.
pub fn extract_emphasis(line: &str) -> InlineText {
    let mut text = String::with_capacity(line.len());
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in EMPHASIS.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let (inner, style) = if let Some(m) = caps.get(1) {
            (m, EmphasisStyle::BoldItalic)
        } else if let Some(m) = caps.get(2) {
            (m, EmphasisStyle::Bold)
        } else if let Some(m) = caps.get(3) {
            (m, EmphasisStyle::Italic)
        } else {
            continue;
        };

        text.push_str(&line[last..whole.start()]);
        let start = text.len();
        text.push_str(inner.as_str());
        spans.push(EmphasisSpan::new(start, text.len(), style));
        last = whole.end();
    }
    text.push_str(&line[last..]);

    InlineText { text, spans }
}

/// Normalize an isolated `--` between words to an em dash.
///
/// En and em dashes already present (word connectors, numeric ranges such
/// as `1940–1950`) are left untouched.
pub fn normalize_dashes(line: &str) -> String {
    if !line.contains("--") {
        return line.to_string();
    }
    DOUBLE_HYPHEN.replace_all(line, "$1$2—$3$4").to_string()
}

/// Trim the text and shift spans accordingly, clipping spans to the result.
pub fn trim_inline(inline: InlineText) -> InlineText {
    let lead = inline.text.len() - inline.text.trim_start().len();
    let trimmed = inline.text.trim();
    let len = trimmed.len();
    let spans = inline
        .spans
        .into_iter()
        .filter_map(|s| {
            let start = s.start.saturating_sub(lead).min(len);
            let end = s.end.saturating_sub(lead).min(len);
            (end > start).then(|| EmphasisSpan::new(start, end, s.style))
        })
        .collect();
    InlineText {
        text: trimmed.to_string(),
        spans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_italic_spans() {
        let inline = extract_emphasis("A **bold** and *italic* word");
        assert_eq!(inline.text, "A bold and italic word");
        assert_eq!(inline.spans.len(), 2);
        assert_eq!(inline.spans[0].style, EmphasisStyle::Bold);
        assert_eq!(&inline.text[inline.spans[0].start..inline.spans[0].end], "bold");
        assert_eq!(inline.spans[1].style, EmphasisStyle::Italic);
        assert_eq!(&inline.text[inline.spans[1].start..inline.spans[1].end], "italic");
    }

    #[test]
    fn test_bold_italic() {
        let inline = extract_emphasis("***Key Findings***");
        assert_eq!(inline.text, "Key Findings");
        assert_eq!(inline.fully_wrapped(), Some(EmphasisStyle::BoldItalic));
    }

    #[test]
    fn test_unbalanced_markers_stay_literal() {
        let inline = extract_emphasis("5 ** 3 is **not closed");
        assert_eq!(inline.text, "5 ** 3 is **not closed");
        assert!(inline.spans.is_empty());
    }

    #[test]
    fn test_bullet_star_is_not_italic() {
        let inline = extract_emphasis("* first item with *stress*");
        assert_eq!(inline.text, "* first item with stress");
        assert_eq!(inline.spans.len(), 1);
    }

    #[test]
    fn test_dash_normalization() {
        assert_eq!(normalize_dashes("well--known"), "well—known");
        assert_eq!(normalize_dashes("wait -- what"), "wait — what");
        assert_eq!(normalize_dashes("1940–1950"), "1940–1950");
        assert_eq!(normalize_dashes("state-of-the-art"), "state-of-the-art");
        assert_eq!(normalize_dashes("----"), "----");
    }

    #[test]
    fn test_trim_inline_shifts_spans() {
        let inline = trim_inline(extract_emphasis("   **Scope** here  "));
        assert_eq!(inline.text, "Scope here");
        assert_eq!(inline.spans[0].start, 0);
        assert_eq!(inline.spans[0].end, 5);
    }
}
