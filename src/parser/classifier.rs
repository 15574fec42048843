//! Line classification.
//!
//! Each line is classified by an ordered rule table: the first rule that
//! returns a verdict wins. A rule sees the line itself, the previously
//! classified line and the next raw line, and nothing else.

use crate::model::{
    alpha_value, chapter_number, from_roman, rebase_spans, CaptionKind, ChapterLabel,
    ClassifiedLine, EmphasisSpan, LineClass, NumberingKind, NumberingToken,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::inline::{extract_emphasis, normalize_dashes, trim_inline, InlineText};
use super::options::ParseOptions;
use super::table_detector::TableDetector;

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(\S.*)$").unwrap());

static HIERARCHICAL_ARABIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}(?:\.\d{1,3})+\.?)\s+").unwrap());

static HIERARCHICAL_ROMAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([IVXLCDM]+)\.(\d{1,3}(?:\.\d{1,3})*)\.?\s+").unwrap());

static SIMPLE_ARABIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})[.)]\s+").unwrap());

static ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([IVXLCDM]+|[ivxlcdm]+)[.)]\s+").unwrap());

static LETTERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z])[.)]\s+").unwrap());

static CHAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:chapter)\s+([A-Za-z]+|\d+)\b\s*(?:[:.\-–—]\s*)?(.*)$").unwrap()
});

static CAPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Table|TABLE|Figure|FIGURE|Fig\.|FIG\.)\s+\d+(?:\.\d+)*\s*([:.\-–—])?\s*(.*)$")
        .unwrap()
});

const BULLET_MARKERS: &[char] = &['-', '•', '*', '○', '■', '●', '▪', '◦'];

const PAGE_BREAK_MARKERS: &[&str] = &["[PAGE BREAK]", "[PAGEBREAK]", "\\newpage", "\\pagebreak"];

/// Maximum words in a heading-like fragment.
const HEADING_MAX_WORDS: usize = 12;

/// Context window for classifying one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext<'a> {
    /// The previously classified line
    pub previous: Option<&'a ClassifiedLine>,
    /// The next raw input line
    pub next_raw: Option<&'a str>,
}

/// A line prepared for the rules: dashes normalized, emphasis extracted.
struct Candidate<'a> {
    raw: &'a str,
    /// Marker-free text before trimming, for column positions
    padded: String,
    /// Marker-free trimmed text with spans
    inline: InlineText,
    indent: usize,
}

impl<'a> Candidate<'a> {
    fn new(raw: &'a str) -> Self {
        let extracted = extract_emphasis(&normalize_dashes(raw));
        let padded = extracted.text.clone();
        let inline = trim_inline(extracted);
        let indent = raw
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .map(|c| if c == '\t' { 4 } else { 1 })
            .sum();
        Self {
            raw,
            padded,
            inline,
            indent,
        }
    }

    fn text(&self) -> &str {
        &self.inline.text
    }
}

/// Outcome of a matching rule.
struct Verdict {
    class: LineClass,
    confidence: f32,
    /// Content text when it differs from the candidate's full text
    content: Option<InlineText>,
}

impl Verdict {
    fn new(class: LineClass, confidence: f32) -> Self {
        Self {
            class,
            confidence,
            content: None,
        }
    }

    fn with_content(mut self, content: InlineText) -> Self {
        self.content = Some(content);
        self
    }
}

type RuleFn = fn(&LineClassifier, &Candidate<'_>, &ClassifyContext<'_>) -> Option<Verdict>;

/// A named classification rule.
struct Rule {
    name: &'static str,
    apply: RuleFn,
}

/// Rules in precedence order.
const RULES: &[Rule] = &[
    Rule {
        name: "page_break",
        apply: LineClassifier::rule_page_break,
    },
    Rule {
        name: "blank",
        apply: LineClassifier::rule_blank,
    },
    Rule {
        name: "section_break",
        apply: LineClassifier::rule_section_break,
    },
    Rule {
        name: "markdown_heading",
        apply: LineClassifier::rule_markdown_heading,
    },
    Rule {
        name: "emphasis_wrapper",
        apply: LineClassifier::rule_emphasis_wrapper,
    },
    Rule {
        name: "existing_numbering",
        apply: LineClassifier::rule_existing_numbering,
    },
    Rule {
        name: "bullet",
        apply: LineClassifier::rule_bullet,
    },
    Rule {
        name: "table_row",
        apply: LineClassifier::rule_table_row,
    },
    Rule {
        name: "caption",
        apply: LineClassifier::rule_caption,
    },
    Rule {
        name: "plain_heading",
        apply: LineClassifier::rule_plain_heading,
    },
    Rule {
        name: "paragraph",
        apply: LineClassifier::rule_paragraph,
    },
];

/// Names of the classification rules in the order they are tried.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|r| r.name).collect()
}

/// Assigns a semantic type to each input line.
pub struct LineClassifier {
    detector: TableDetector,
    keywords: Vec<String>,
}

impl LineClassifier {
    /// Create a classifier using the keyword list of the given options.
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            detector: TableDetector::new(),
            keywords: options.keywords.clone(),
        }
    }

    /// Replace the table detector.
    pub fn with_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Classify one line given its context window.
    pub fn classify(
        &self,
        line: &str,
        index: usize,
        previous: Option<&ClassifiedLine>,
        next_raw: Option<&str>,
    ) -> ClassifiedLine {
        let context = ClassifyContext { previous, next_raw };
        let candidate = Candidate::new(line);

        for rule in RULES {
            if let Some(verdict) = (rule.apply)(self, &candidate, &context) {
                log::trace!(
                    "line {}: {} via {} ({:.2})",
                    index,
                    verdict.class.line_type(),
                    rule.name,
                    verdict.confidence
                );
                let content = verdict.content.unwrap_or_else(|| candidate.inline.clone());
                return ClassifiedLine {
                    index,
                    raw: line.to_string(),
                    text: content.text,
                    class: verdict.class,
                    confidence: verdict.confidence.clamp(0.0, 1.0),
                    emphasis: content.spans,
                    indent: candidate.indent,
                    rule: rule.name.to_string(),
                };
            }
        }

        // The paragraph rule always matches; this is only reached for an
        // empty rule table.
        ClassifiedLine {
            index,
            raw: line.to_string(),
            text: candidate.inline.text.clone(),
            class: LineClass::Paragraph,
            confidence: 0.5,
            emphasis: candidate.inline.spans.clone(),
            indent: candidate.indent,
            rule: "paragraph".to_string(),
        }
    }

    /// Classify a sequence of lines, threading the context window.
    pub fn classify_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ClassifiedLine> {
        let mut classified: Vec<ClassifiedLine> = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let next_raw = lines.get(index + 1).map(|l| l.as_ref());
            let line = self.classify(line.as_ref(), index, classified.last(), next_raw);
            classified.push(line);
        }
        classified
    }

    fn is_keyword(&self, text: &str) -> bool {
        let normalized = super::options::normalize_keyword(text);
        self.keywords.iter().any(|k| *k == normalized)
    }

    // ==================== Rules ====================

    fn rule_page_break(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        let trimmed = c.raw.trim_matches([' ', '\t']);
        let is_break = (!trimmed.is_empty() && trimmed.chars().all(|ch| ch == '\u{000C}'))
            || PAGE_BREAK_MARKERS
                .iter()
                .any(|m| trimmed.eq_ignore_ascii_case(m));
        is_break.then(|| Verdict::new(LineClass::PageBreak, 1.0))
    }

    fn rule_blank(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        c.raw
            .trim()
            .is_empty()
            .then(|| Verdict::new(LineClass::Blank, 1.0))
    }

    fn rule_section_break(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        let marks: Vec<char> = c.raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        let first = *marks.first()?;
        let is_rule =
            marks.len() >= 3 && (first == '-' || first == '*') && marks.iter().all(|m| *m == first);
        is_rule.then(|| Verdict::new(LineClass::SectionBreak, 0.95))
    }

    fn rule_markdown_heading(
        &self,
        c: &Candidate<'_>,
        _: &ClassifyContext<'_>,
    ) -> Option<Verdict> {
        let caps = MARKDOWN_HEADING.captures(c.text())?;
        let hashes = caps.get(1)?.as_str().len() as u8;
        let inner_start = caps.get(2)?.start();
        let inner = InlineText {
            text: c.text()[inner_start..].trim_end_matches([' ', '#']).to_string(),
            spans: rebase_spans(&c.inline.spans, inner_start),
        };
        let inner = trim_inline(inner);

        if let Some((number, rest)) = detect_heading_numbering(&inner.text) {
            let content = cut_prefix(&inner, rest);
            return Some(
                Verdict::new(LineClass::NumberedHeading { number }, 0.95).with_content(content),
            );
        }

        let chapter = chapter_label(&inner.text);
        let keyword = chapter.is_some() || self.is_keyword(&inner.text);
        Some(
            Verdict::new(
                LineClass::Heading {
                    depth_hint: Some(hashes),
                    keyword,
                    chapter,
                },
                0.95,
            )
            .with_content(inner),
        )
    }

    fn rule_emphasis_wrapper(
        &self,
        c: &Candidate<'_>,
        _: &ClassifyContext<'_>,
    ) -> Option<Verdict> {
        let style = c.inline.fully_wrapped()?;
        if !style.is_bold() {
            return None;
        }
        let text = c.text();
        if text.split_whitespace().count() >= HEADING_MAX_WORDS || ends_sentence(text) {
            return None;
        }

        if let Some((number, rest)) = detect_heading_numbering(text) {
            let content = cut_prefix(&c.inline, rest);
            return Some(
                Verdict::new(LineClass::NumberedHeading { number }, 0.85).with_content(content),
            );
        }

        let chapter = chapter_label(text);
        let keyword = chapter.is_some() || self.is_keyword(text);
        let depth_hint = if keyword { Some(1) } else { None };
        Some(Verdict::new(
            LineClass::Heading {
                depth_hint,
                keyword,
                chapter,
            },
            0.8,
        ))
    }

    fn rule_existing_numbering(
        &self,
        c: &Candidate<'_>,
        context: &ClassifyContext<'_>,
    ) -> Option<Verdict> {
        let (number, rest) = detect_numbering(c.text())?;
        let content = cut_prefix(&c.inline, rest);
        let body = content.text.as_str();

        let mut heading_score = 0i32;
        let mut list_score = 0i32;

        let words = body.split_whitespace().count();
        let trailing_colon = body.ends_with(':');
        let terminal = ends_sentence(body);
        let starts_upper = body.chars().next().is_some_and(|ch| !ch.is_lowercase());

        if !terminal {
            heading_score += 1;
        }
        if trailing_colon {
            heading_score += 1;
        }
        if words <= HEADING_MAX_WORDS {
            heading_score += 1;
        } else {
            list_score += 2;
        }
        if starts_upper {
            heading_score += 1;
        } else {
            list_score += 2;
        }
        if number.depth() >= 2 {
            heading_score += 1;
        }
        if terminal {
            list_score += 2;
        }
        if number.kind == NumberingKind::Alpha {
            list_score += 1;
        }
        if in_numbered_run(&number, context) {
            list_score += 3;
        }

        let margin = (heading_score - list_score).unsigned_abs() as f32;
        let confidence = (0.6 + 0.07 * margin).min(0.95);

        let class = if heading_score > list_score {
            LineClass::NumberedHeading { number }
        } else if number.kind == NumberingKind::Alpha {
            LineClass::LetteredListItem { number }
        } else {
            LineClass::NumberedListItem { number }
        };
        Some(Verdict::new(class, confidence).with_content(content))
    }

    fn rule_bullet(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        let text = c.text();
        let marker = text.chars().next()?;
        if !BULLET_MARKERS.contains(&marker) {
            return None;
        }
        let after = &text[marker.len_utf8()..];
        if !after.starts_with([' ', '\t']) || after.trim().is_empty() {
            return None;
        }
        let content = trim_inline(InlineText {
            text: after.to_string(),
            spans: rebase_spans(&c.inline.spans, marker.len_utf8()),
        });
        Some(Verdict::new(LineClass::BulletListItem { marker }, 0.9).with_content(content))
    }

    fn rule_table_row(&self, c: &Candidate<'_>, context: &ClassifyContext<'_>) -> Option<Verdict> {
        if let Some(row) = self.detector.parse_pipe_row(c.text()) {
            return Some(Verdict::new(
                LineClass::TableRow {
                    cells: row.cells,
                    columns: Vec::new(),
                    separator: row.separator,
                },
                0.95,
            ));
        }

        let split = self.detector.split_columns(&c.padded)?;

        let previous_aligned = context.previous.is_some_and(|prev| match &prev.class {
            LineClass::TableRow { columns, .. } if !columns.is_empty() => {
                self.detector
                    .matches_columns(columns, prev.raw.contains('\t'), &split)
            }
            _ => false,
        });

        let next_aligned = || {
            context.next_raw.is_some_and(|next| {
                let next = extract_emphasis(&normalize_dashes(next)).text;
                self.detector
                    .split_columns(&next)
                    .is_some_and(|other| self.detector.is_aligned(&split, &other))
            })
        };

        if !previous_aligned && !next_aligned() {
            log::debug!(
                "TableDetector: {} columns but no aligned neighbor, not a table",
                split.len()
            );
            return None;
        }

        Some(Verdict::new(
            LineClass::TableRow {
                cells: split.cells,
                columns: split.starts,
                separator: false,
            },
            0.8,
        ))
    }

    fn rule_caption(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        let caps = CAPTION.captures(c.text())?;
        let title = caps.get(3).map_or("", |m| m.as_str());
        let separated = caps.get(2).is_some();
        // "Table 1 shows that ..." is prose referring to a table.
        if !separated
            && !title.is_empty()
            && (ends_sentence(title) || title.split_whitespace().count() > HEADING_MAX_WORDS)
        {
            return None;
        }
        let kind = if caps.get(1)?.as_str().to_ascii_lowercase().starts_with("table") {
            CaptionKind::Table
        } else {
            CaptionKind::Figure
        };
        Some(Verdict::new(LineClass::Caption { kind }, 0.85))
    }

    fn rule_plain_heading(&self, c: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        let text = c.text();

        if let Some(chapter) = chapter_label(text) {
            return Some(Verdict::new(
                LineClass::Heading {
                    depth_hint: Some(1),
                    keyword: true,
                    chapter: Some(chapter),
                },
                0.9,
            ));
        }

        if self.is_keyword(text) {
            return Some(Verdict::new(
                LineClass::Heading {
                    depth_hint: Some(1),
                    keyword: true,
                    chapter: None,
                },
                0.9,
            ));
        }

        if is_all_uppercase(text) && text.split_whitespace().count() <= HEADING_MAX_WORDS {
            return Some(Verdict::new(
                LineClass::Heading {
                    depth_hint: None,
                    keyword: false,
                    chapter: None,
                },
                0.7,
            ));
        }

        None
    }

    fn rule_paragraph(&self, _: &Candidate<'_>, _: &ClassifyContext<'_>) -> Option<Verdict> {
        Some(Verdict::new(LineClass::Paragraph, 0.5))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(&ParseOptions::default())
    }
}

/// Detect an existing numbering token at the start of `text`.
///
/// Returns the token and the byte offset where the item text begins.
/// Patterns are tried in order: hierarchical arabic (`1.2`, `2.0`),
/// hierarchical roman (`II.1`), simple arabic (`3.`, `3)`), roman (`IV.`),
/// lettered (`a)`, `B.`). A lone upper-case `I`, `V` or `X` is roman; any
/// other single letter is lettered.
pub fn detect_numbering(text: &str) -> Option<(NumberingToken, usize)> {
    detect_numbering_in(text, true)
}

/// Like [`detect_numbering`], for text already known to be a heading
/// (`## 1.1 background`, `**1.1 background**`). The hierarchical forms are
/// accepted whatever follows them.
pub fn detect_heading_numbering(text: &str) -> Option<(NumberingToken, usize)> {
    detect_numbering_in(text, false)
}

fn detect_numbering_in(text: &str, guard_prose: bool) -> Option<(NumberingToken, usize)> {
    if let Some(m) = HIERARCHICAL_ARABIC.find(text) {
        let rest = &text[m.end()..];
        if !guard_prose || starts_like_title(rest) {
            let raw = m.as_str().trim_end();
            let levels = raw
                .trim_end_matches('.')
                .split('.')
                .filter_map(|p| p.parse().ok())
                .collect();
            return Some((
                NumberingToken::new(NumberingKind::Arabic, levels, raw),
                m.end(),
            ));
        }
        return None;
    }

    if let Some(caps) = HIERARCHICAL_ROMAN.captures(text) {
        let whole = caps.get(0)?;
        let rest = &text[whole.end()..];
        if let Some(top) = from_roman(caps.get(1)?.as_str()) {
            if !guard_prose || starts_like_title(rest) {
                let mut levels = vec![top];
                let tail = caps.get(2)?.as_str();
                levels.extend(tail.split('.').filter_map(|p| p.parse::<u32>().ok()));
                let raw = whole.as_str().trim_end();
                return Some((
                    NumberingToken::new(NumberingKind::Roman, levels, raw),
                    whole.end(),
                ));
            }
        }
    }

    if let Some(caps) = SIMPLE_ARABIC.captures(text) {
        let whole = caps.get(0)?;
        let value: u32 = caps.get(1)?.as_str().parse().ok()?;
        let raw = whole.as_str().trim_end();
        return Some((
            NumberingToken::new(NumberingKind::Arabic, vec![value], raw),
            whole.end(),
        ));
    }

    if let Some(caps) = ROMAN.captures(text) {
        let whole = caps.get(0)?;
        let numeral = caps.get(1)?.as_str();
        let single = numeral.chars().count() == 1;
        let roman_single = single && matches!(numeral, "I" | "V" | "X");
        if !single || roman_single {
            if let Some(value) = from_roman(numeral) {
                let raw = whole.as_str().trim_end();
                return Some((
                    NumberingToken::new(NumberingKind::Roman, vec![value], raw),
                    whole.end(),
                ));
            }
        }
    }

    if let Some(caps) = LETTERED.captures(text) {
        let whole = caps.get(0)?;
        let letter = caps.get(1)?.as_str().chars().next()?;
        let value = alpha_value(letter)?;
        let raw = whole.as_str().trim_end();
        return Some((
            NumberingToken::new(NumberingKind::Alpha, vec![value], raw),
            whole.end(),
        ));
    }

    None
}

/// Parse a chapter label ("CHAPTER ONE", "Chapter 2: Methods").
pub fn chapter_label(text: &str) -> Option<ChapterLabel> {
    let caps = CHAPTER.captures(text.trim())?;
    let number = chapter_number(caps.get(1)?.as_str())?;
    let title = caps.get(2).map_or("", |m| m.as_str().trim());
    if ends_sentence(title) || title.split_whitespace().count() > HEADING_MAX_WORDS {
        return None;
    }
    Some(ChapterLabel {
        number,
        titled: !title.is_empty(),
    })
}

/// Whether a run of same-kind, incrementing numbers surrounds this one.
fn in_numbered_run(number: &NumberingToken, context: &ClassifyContext<'_>) -> bool {
    let follows_previous = context
        .previous
        .and_then(|prev| prev.class.number())
        .is_some_and(|prev| prev.is_followed_by(number));
    if follows_previous {
        return true;
    }

    context.next_raw.is_some_and(|next| {
        let next = extract_emphasis(&normalize_dashes(next)).text;
        detect_numbering(next.trim()).is_some_and(|(token, _)| number.is_followed_by(&token))
    })
}

/// Cut `offset` bytes from the front of an inline text and trim the rest.
fn cut_prefix(inline: &InlineText, offset: usize) -> InlineText {
    let spans: Vec<EmphasisSpan> = rebase_spans(&inline.spans, offset);
    trim_inline(InlineText {
        text: inline.text[offset..].to_string(),
        spans,
    })
}

/// Hierarchical numbers must be followed by something title-like, so that
/// "3.5 million people" stays prose.
fn starts_like_title(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || matches!(c, '(' | '"' | '“' | '\''))
}

fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .ends_with(['.', '!', '?', ';', '。', '！', '？'])
}

fn is_all_uppercase(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineType;

    fn classify_one(line: &str) -> ClassifiedLine {
        LineClassifier::default().classify(line, 0, None, None)
    }

    #[test]
    fn test_rule_order() {
        let names = rule_names();
        assert_eq!(names.first(), Some(&"page_break"));
        assert_eq!(names.last(), Some(&"paragraph"));
        let numbering = names.iter().position(|n| *n == "existing_numbering").unwrap();
        let bullet = names.iter().position(|n| *n == "bullet").unwrap();
        assert!(numbering < bullet);
    }

    #[test]
    fn test_detect_numbering_forms() {
        let (token, rest) = detect_numbering("1.1 Background").unwrap();
        assert_eq!(token.levels, vec![1, 1]);
        assert_eq!(token.raw, "1.1");
        assert_eq!(rest, 4);

        let (token, _) = detect_numbering("2.0 LITERATURE REVIEW").unwrap();
        assert_eq!(token.levels, vec![2, 0]);

        let (token, _) = detect_numbering("IV. Findings").unwrap();
        assert_eq!(token.kind, NumberingKind::Roman);
        assert_eq!(token.levels, vec![4]);

        let (token, _) = detect_numbering("II.1 Scope").unwrap();
        assert_eq!(token.kind, NumberingKind::Roman);
        assert_eq!(token.levels, vec![2, 1]);

        let (token, _) = detect_numbering("c) third").unwrap();
        assert_eq!(token.kind, NumberingKind::Alpha);
        assert_eq!(token.levels, vec![3]);

        let (token, _) = detect_numbering("3) item").unwrap();
        assert_eq!(token.raw, "3)");
    }

    #[test]
    fn test_single_letter_roman_ambiguity() {
        let (token, _) = detect_numbering("I. Overview").unwrap();
        assert_eq!(token.kind, NumberingKind::Roman);

        let (token, _) = detect_numbering("C. Results").unwrap();
        assert_eq!(token.kind, NumberingKind::Alpha);
        assert_eq!(token.levels, vec![3]);

        let (token, _) = detect_numbering("i) first").unwrap();
        assert_eq!(token.kind, NumberingKind::Alpha);

        let (token, _) = detect_numbering("ii) second").unwrap();
        assert_eq!(token.kind, NumberingKind::Roman);
        assert_eq!(token.levels, vec![2]);
    }

    #[test]
    fn test_decimal_prose_is_not_numbering() {
        assert!(detect_numbering("3.5 million people live there.").is_none());
        assert!(detect_numbering("1940–1950 was a decade").is_none());
    }

    #[test]
    fn test_heading_numbering_ignores_case_of_title() {
        assert!(detect_numbering("1.1 background").is_none());
        let (token, rest) = detect_heading_numbering("1.1 background").unwrap();
        assert_eq!(token.levels, vec![1, 1]);
        assert_eq!(rest, 4);

        let (token, _) = detect_heading_numbering("II.1 scope").unwrap();
        assert_eq!(token.kind, NumberingKind::Roman);

        let md = classify_one("## 1.1 background of the study");
        assert_eq!(md.line_type(), LineType::NumberedHeading);
        assert_eq!(md.text, "background of the study");

        let bold = classify_one("**1.2 scope**");
        assert_eq!(bold.line_type(), LineType::NumberedHeading);
        assert_eq!(bold.class.number().map(|n| n.raw.as_str()), Some("1.2"));
        assert_eq!(bold.text, "scope");
    }

    #[test]
    fn test_numbered_heading_vs_list_item() {
        let heading = classify_one("I. Implications for Students");
        assert_eq!(heading.line_type(), LineType::NumberedHeading);
        assert_eq!(heading.text, "Implications for Students");
        assert_eq!(heading.class.number().map(|n| n.raw.as_str()), Some("I."));

        let item = classify_one("1. collect the samples before noon.");
        assert_eq!(item.line_type(), LineType::NumberedListItem);
        assert_eq!(item.text, "collect the samples before noon.");

        let lettered = classify_one("a) gather materials");
        assert_eq!(lettered.line_type(), LineType::LetteredListItem);
    }

    #[test]
    fn test_run_membership_favors_list() {
        let classifier = LineClassifier::default();
        let lines = ["1. Apples", "2. Oranges", "3. Pears"];
        let classified = classifier.classify_lines(&lines);
        assert!(classified
            .iter()
            .all(|l| l.line_type() == LineType::NumberedListItem));
    }

    #[test]
    fn test_trailing_colon_favors_heading() {
        let line = classify_one("2. Requirements:");
        assert_eq!(line.line_type(), LineType::NumberedHeading);
    }

    #[test]
    fn test_section_break() {
        assert_eq!(classify_one("---").line_type(), LineType::SectionBreak);
        assert_eq!(classify_one(" * * * ").line_type(), LineType::SectionBreak);
        assert_eq!(classify_one("--").line_type(), LineType::Paragraph);
        assert_eq!(classify_one("-*-").line_type(), LineType::Paragraph);
    }

    #[test]
    fn test_markdown_heading_with_numbering() {
        let line = classify_one("### **1.1 Background**");
        assert_eq!(line.line_type(), LineType::NumberedHeading);
        assert_eq!(line.text, "Background");

        let line = classify_one("## Data Sources");
        assert_eq!(
            line.class,
            LineClass::Heading {
                depth_hint: Some(2),
                keyword: false,
                chapter: None
            }
        );
    }

    #[test]
    fn test_emphasis_wrapper() {
        let heading = classify_one("**Key Findings**");
        assert_eq!(heading.line_type(), LineType::Heading);
        assert_eq!(heading.text, "Key Findings");

        let sentence = classify_one("**This whole sentence is bold for emphasis.**");
        assert_eq!(sentence.line_type(), LineType::Paragraph);
        assert_eq!(sentence.emphasis.len(), 1);
    }

    #[test]
    fn test_bullets() {
        for line in ["- item", "• item", "* item", "○ item", "■ item"] {
            let classified = classify_one(line);
            assert_eq!(classified.line_type(), LineType::BulletListItem, "{line}");
            assert_eq!(classified.text, "item");
        }
        assert_eq!(classify_one("-5 degrees").line_type(), LineType::Paragraph);
    }

    #[test]
    fn test_plain_headings() {
        let upper = classify_one("RESEARCH DESIGN");
        assert_eq!(upper.line_type(), LineType::Heading);

        let keyword = classify_one("Introduction");
        assert_eq!(
            keyword.class,
            LineClass::Heading {
                depth_hint: Some(1),
                keyword: true,
                chapter: None
            }
        );

        let chapter = classify_one("CHAPTER ONE");
        match chapter.class {
            LineClass::Heading {
                chapter: Some(label),
                ..
            } => {
                assert_eq!(label.number, 1);
                assert!(!label.titled);
            }
            other => panic!("expected chapter heading, got {other:?}"),
        }

        let titled = chapter_label("Chapter 2: Methods").unwrap();
        assert_eq!(titled.number, 2);
        assert!(titled.titled);

        assert!(chapter_label("Chapter 2 describes the sampling method.").is_none());
    }

    #[test]
    fn test_captions() {
        let table = classify_one("Table 3: Distribution of respondents");
        assert_eq!(table.class, LineClass::Caption { kind: CaptionKind::Table });

        let figure = classify_one("Fig. 2 Conceptual framework");
        assert_eq!(figure.class, LineClass::Caption { kind: CaptionKind::Figure });

        let figure = classify_one("Figure 2. Conceptual framework");
        assert_eq!(figure.class, LineClass::Caption { kind: CaptionKind::Figure });

        let prose = classify_one("Table 1 shows that most respondents agreed.");
        assert_eq!(prose.line_type(), LineType::Paragraph);
    }

    #[test]
    fn test_page_break_markers() {
        assert_eq!(classify_one("\u{000C}").line_type(), LineType::PageBreak);
        assert_eq!(classify_one("[PAGE BREAK]").line_type(), LineType::PageBreak);
        assert_eq!(classify_one("   ").line_type(), LineType::Blank);
    }

    #[test]
    fn test_table_needs_aligned_neighbor() {
        let classifier = LineClassifier::default();
        let lines = ["Name\tAge\tCity", "John\t25\tLondon"];
        let classified = classifier.classify_lines(&lines);
        assert!(classified.iter().all(|l| l.line_type() == LineType::TableRow));

        let lone = classifier.classify(
            "The results  were  striking across  all groups",
            0,
            None,
            Some("and this is the following prose line."),
        );
        assert_eq!(lone.line_type(), LineType::Paragraph);
    }

    #[test]
    fn test_malformed_pipe_row_degrades() {
        let line = classify_one("| Name | Age");
        assert_eq!(line.line_type(), LineType::Paragraph);
    }

    #[test]
    fn test_indent_recorded() {
        let line = classify_one("    continued text");
        assert_eq!(line.indent, 4);
        assert_eq!(line.text, "continued text");
    }
}
