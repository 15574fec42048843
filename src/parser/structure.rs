//! Structure building: folds classified lines into a section tree.
//!
//! Single pass over the line stream with a stack of open sections. The
//! bottom of the stack is the root; new content always goes to the top.

use crate::model::{
    ClassifiedLine, ContentBlock, LineClass, ListBlock, ListItem, ListKind, Paragraph,
    ParagraphRole, ProcessingStats, Section, SectionKind, TableBlock,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::numbering::{number_heading, should_synthesize, HeadingNumberingState, HeadingRequest};
use super::options::{is_reference_heading, ListRetention, ParseOptions};

static DEFINITION_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:Definition|Objective|Task|Goal|Purpose|Aim|Method|Result|Conclusion|Note|Important|Key Point|Summary|Overview|Background)s?\s*:",
    )
    .unwrap()
});

/// Short-document verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortDocument {
    /// Whether forced page breaks are suppressed
    pub is_short: bool,
    /// Total words counted
    pub word_count: usize,
    /// Human-readable reason
    pub reason: String,
}

/// Decide whether a document is short, counting words over all lines.
pub fn short_document(lines: &[ClassifiedLine], threshold: usize) -> ShortDocument {
    let word_count: usize = lines.iter().map(|l| l.word_count()).sum();
    let is_short = word_count < threshold;
    let reason = if is_short {
        format!("{} words, below the {}-word threshold", word_count, threshold)
    } else {
        format!("{} words, at or above the {}-word threshold", word_count, threshold)
    };
    ShortDocument {
        is_short,
        word_count,
        reason,
    }
}

/// Result of building the section tree.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Root section
    pub root: Section,
    /// Numbering state after the last heading
    pub state: HeadingNumberingState,
    /// Structure statistics
    pub stats: ProcessingStats,
}

/// Build the section tree with the given options.
pub fn build(lines: &[ClassifiedLine], options: &ParseOptions) -> Section {
    let state = HeadingNumberingState::new(should_synthesize(options.numbering, lines));
    let short = short_document(lines, options.short_document_words);
    StructureBuilder::new(options, state, short.is_short)
        .build(lines)
        .root
}

/// Kind of a list item line, if it is one.
fn list_kind(class: &LineClass) -> Option<ListKind> {
    match class {
        LineClass::BulletListItem { .. } => Some(ListKind::Bullet),
        LineClass::NumberedListItem { .. } => Some(ListKind::Numbered),
        LineClass::LetteredListItem { .. } => Some(ListKind::Lettered),
        _ => None,
    }
}

struct OpenTable {
    rows: Vec<Vec<String>>,
    header: bool,
}

/// Folds classified lines into a [`Section`] tree.
pub struct StructureBuilder<'o> {
    options: &'o ParseOptions,
    is_short: bool,
    state: HeadingNumberingState,
    stack: Vec<Section>,
    list: Option<ListBlock>,
    table: Option<OpenTable>,
    pending_blank: bool,
    awaiting_chapter_title: bool,
    stats: ProcessingStats,
}

impl<'o> StructureBuilder<'o> {
    /// Create a builder.
    pub fn new(options: &'o ParseOptions, state: HeadingNumberingState, is_short: bool) -> Self {
        Self {
            options,
            is_short,
            state,
            stack: vec![Section::root()],
            list: None,
            table: None,
            pending_blank: false,
            awaiting_chapter_title: false,
            stats: ProcessingStats::new(),
        }
    }

    /// Consume the line stream and return the tree.
    pub fn build(mut self, lines: &[ClassifiedLine]) -> BuildOutput {
        for line in lines {
            self.feed(line);
        }
        self.finish()
    }

    fn feed(&mut self, line: &ClassifiedLine) {
        if !line.is_blank() && !line.class.is_heading() {
            self.awaiting_chapter_title = false;
        }

        match &line.class {
            LineClass::Blank => {
                self.flush_table();
                self.pending_blank = true;
                return;
            }
            LineClass::Heading { .. } | LineClass::NumberedHeading { .. } => {
                self.flush();
                self.open_heading(line);
            }
            LineClass::BulletListItem { .. }
            | LineClass::NumberedListItem { .. }
            | LineClass::LetteredListItem { .. } => {
                self.flush_table();
                self.push_list_item(line);
            }
            LineClass::TableRow {
                cells, separator, ..
            } => {
                self.flush_list();
                self.push_table_row(cells, *separator);
            }
            LineClass::SectionBreak => {
                self.flush();
                self.top().push(ContentBlock::SectionBreak);
            }
            LineClass::PageBreak => {
                self.flush();
                self.explicit_page_break();
            }
            LineClass::Caption { kind } => {
                self.flush();
                let paragraph = Paragraph::new(line.text.clone())
                    .with_emphasis(line.emphasis.clone())
                    .with_role(ParagraphRole::Caption(*kind));
                self.push_paragraph(paragraph);
            }
            LineClass::Paragraph => {
                if line.indent > 0 && !self.pending_blank {
                    if let Some(item) = self.list.as_mut().and_then(|l| l.items.last_mut()) {
                        item.append(&line.text, &line.emphasis);
                        return;
                    }
                }
                self.flush();
                let paragraph = self
                    .body_paragraph(&line.text)
                    .with_emphasis(line.emphasis.clone());
                self.push_paragraph(paragraph);
            }
        }
        self.pending_blank = false;
    }

    fn top(&mut self) -> &mut Section {
        if self.stack.is_empty() {
            self.stack.push(Section::root());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn top_ref(&self) -> Option<&Section> {
        self.stack.last()
    }

    // ==================== Headings ====================

    fn open_heading(&mut self, line: &ClassifiedLine) {
        let request = HeadingRequest::from_line(line);

        if self.awaiting_chapter_title && request.existing.is_none() && request.chapter.is_none() {
            log::debug!("chapter title {:?} attached to its label", line.text);
            self.top().subtitle = Some(line.text.clone());
            self.awaiting_chapter_title = false;
            return;
        }

        let outcome = number_heading(&request, self.state);
        self.state = outcome.new_state;
        let depth = outcome.depth;

        let keyword = request.chapter.is_some() || self.options.is_keyword(&line.text);
        let numbered_subsection = request.existing.is_some_and(|n| n.depth() >= 2);
        if depth == 1 && keyword && !numbered_subsection {
            self.forced_page_break(&line.text);
        }

        while self.stack.len() > 1 && self.top_ref().is_some_and(|s| s.level >= depth) {
            self.close_top();
        }

        let kind = if request.chapter.is_some() {
            SectionKind::Chapter
        } else if is_reference_heading(&line.text) {
            SectionKind::References
        } else {
            SectionKind::Body
        };
        let mut section = Section::new(line.text.clone(), depth).with_kind(kind);
        if let Some(number) = outcome.number {
            if outcome.was_renumbered {
                self.stats.synthesized_numbers += 1;
            } else {
                self.stats.existing_numbers += 1;
            }
            section = section.with_number(number, outcome.was_renumbered);
        } else if request.chapter.is_some() {
            self.stats.existing_numbers += 1;
        }

        log::debug!(
            "open section depth {} under depth {}: {:?}",
            depth,
            self.top_ref().map_or(0, |s| s.level),
            outcome.numbered
        );

        self.awaiting_chapter_title = line_is_untitled_chapter(line);
        self.stats.section_count += 1;
        self.stack.push(section);
    }

    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(done) = self.stack.pop() {
            self.top().children.push(done);
        }
    }

    // ==================== Page breaks ====================

    fn forced_page_break(&mut self, heading: &str) {
        if !self.options.page_breaks {
            return;
        }
        if self.is_short {
            log::debug!("page break before {:?} suppressed: short document", heading);
            self.stats.suppressed_page_breaks += 1;
            return;
        }
        if self.stack.len() == 1 && self.stack[0].is_empty() {
            // Nothing precedes the heading.
            return;
        }
        if self.top().last_block().is_some_and(ContentBlock::is_page_break) {
            log::debug!("page break before {:?} collapsed into previous", heading);
            self.stats.suppressed_page_breaks += 1;
            return;
        }
        log::debug!("page break before {:?}", heading);
        self.top().push(ContentBlock::PageBreak);
        self.stats.forced_page_breaks += 1;
    }

    fn explicit_page_break(&mut self) {
        if self.top().last_block().is_some_and(ContentBlock::is_page_break) {
            self.stats.suppressed_page_breaks += 1;
            return;
        }
        self.top().push(ContentBlock::PageBreak);
        self.stats.explicit_page_breaks += 1;
    }

    // ==================== Paragraphs ====================

    fn body_paragraph(&self, text: &str) -> Paragraph {
        let in_references = self
            .top_ref()
            .is_some_and(|s| s.kind == SectionKind::References);
        let role = if in_references {
            ParagraphRole::Reference
        } else if let Some(m) = DEFINITION_TERM.find(text) {
            ParagraphRole::Definition(m.end())
        } else {
            ParagraphRole::Body
        };
        Paragraph::new(text).with_role(role)
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.stats.paragraph_count += 1;
        self.top().push(ContentBlock::Paragraph(paragraph));
    }

    // ==================== Lists ====================

    fn push_list_item(&mut self, line: &ClassifiedLine) {
        let Some(kind) = list_kind(&line.class) else {
            return;
        };

        let mut item = ListItem::new(line.text.clone());
        item.emphasis = line.emphasis.clone();
        item.number = line.class.number().cloned();
        if let LineClass::BulletListItem { marker } = line.class {
            item.marker = Some(marker);
        }

        if self.list.as_ref().is_some_and(|l| l.kind != kind) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| ListBlock::new(kind))
            .items
            .push(item);
    }

    fn flush_list(&mut self) {
        let Some(list) = self.list.take() else {
            return;
        };

        if list.kind != ListKind::Bullet {
            self.stats.lists_retained += 1;
            self.top().push(ContentBlock::List(list));
            return;
        }

        match retention_failure(&list, &self.options.list_retention) {
            None => {
                self.stats.lists_retained += 1;
                self.top().push(ContentBlock::List(list));
            }
            Some(reason) => {
                log::debug!("bullet list of {} items collapsed: {}", list.len(), reason);
                self.stats.lists_collapsed += 1;
                for item in list.items {
                    let marker = item.marker.unwrap_or('•').to_string();
                    let paragraph = self
                        .body_paragraph(&item.text)
                        .with_emphasis(item.emphasis)
                        .with_marker(marker);
                    self.push_paragraph(paragraph);
                }
            }
        }
    }

    // ==================== Tables ====================

    fn push_table_row(&mut self, cells: &[String], separator: bool) {
        if separator {
            match self.table.as_mut() {
                Some(table) if table.rows.len() == 1 && !table.header => table.header = true,
                _ => log::debug!("table separator row consumed"),
            }
            return;
        }
        self.table
            .get_or_insert_with(|| OpenTable {
                rows: Vec::new(),
                header: false,
            })
            .rows
            .push(cells.to_vec());
    }

    fn flush_table(&mut self) {
        if let Some(table) = self.table.take() {
            if !table.rows.is_empty() {
                self.stats.table_count += 1;
                self.top()
                    .push(ContentBlock::Table(TableBlock::new(table.rows, table.header)));
            }
        }
    }

    fn flush(&mut self) {
        self.flush_list();
        self.flush_table();
    }

    fn finish(mut self) -> BuildOutput {
        self.flush();
        while self.stack.len() > 1 {
            self.close_top();
        }
        let root = self.stack.pop().unwrap_or_default();
        BuildOutput {
            root,
            state: self.state,
            stats: self.stats,
        }
    }
}

/// Why a bullet list fails retention, or `None` if it is kept.
fn retention_failure(list: &ListBlock, retention: &ListRetention) -> Option<String> {
    if list.len() < retention.min_items {
        return Some(format!(
            "{} items, fewer than {}",
            list.len(),
            retention.min_items
        ));
    }
    if let Some(item) = list.items.iter().find(|i| i.word_count() > retention.max_words) {
        return Some(format!(
            "an item has {} words, more than {}",
            item.word_count(),
            retention.max_words
        ));
    }
    let early_colon = list.items.iter().any(|i| {
        i.text
            .chars()
            .take(retention.colon_window)
            .any(|c| c == ':')
    });
    if early_colon {
        return Some(format!(
            "an item has a colon within its first {} characters",
            retention.colon_window
        ));
    }
    None
}

fn line_is_untitled_chapter(line: &ClassifiedLine) -> bool {
    matches!(
        line.class,
        LineClass::Heading {
            chapter: Some(label),
            ..
        } if !label.titled
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineClassifier;

    fn build_text(text: &str, options: &ParseOptions) -> BuildOutput {
        let lines: Vec<&str> = text.lines().collect();
        let classified = LineClassifier::new(options).classify_lines(&lines);
        let state = HeadingNumberingState::new(should_synthesize(options.numbering, &classified));
        let short = short_document(&classified, options.short_document_words);
        StructureBuilder::new(options, state, short.is_short).build(&classified)
    }

    fn long_filler(words: usize) -> String {
        vec!["word"; words].join(" ") + "."
    }

    #[test]
    fn test_heading_nesting() {
        let options = ParseOptions::default();
        let out = build_text(
            "## Overview\nText one.\n### Detail\nText two.\n## Next\nText three.",
            &options,
        );
        let root = out.root;
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].heading.as_deref(), Some("Detail"));
        assert_eq!(root.children[1].heading.as_deref(), Some("Next"));
    }

    #[test]
    fn test_orphan_deep_heading_attaches_to_root() {
        let options = ParseOptions::default();
        let out = build_text("Preface text.\n### Deep Heading\nBody.", &options);
        assert_eq!(out.root.children.len(), 1);
        assert_eq!(out.root.children[0].level, 3);
        assert_eq!(out.root.content.len(), 1);
    }

    #[test]
    fn test_bullet_retention() {
        let options = ParseOptions::default();
        let kept = build_text("- alpha\n- beta\n- gamma\n- delta", &options);
        assert!(matches!(kept.root.content[0], ContentBlock::List(ref l) if l.len() == 4));
        assert_eq!(kept.stats.lists_retained, 1);

        let three = build_text("- alpha\n- beta\n- gamma", &options);
        assert_eq!(three.root.content.len(), 3);
        match &three.root.content[0] {
            ContentBlock::Paragraph(p) => assert_eq!(p.display_text(), "- alpha"),
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert_eq!(three.stats.lists_collapsed, 1);
    }

    #[test]
    fn test_section_break_closes_list() {
        let options = ParseOptions::default();
        let out = build_text("- a\n- b\n- c\n- d\n---\n- e", &options);
        match &out.root.content[..] {
            [ContentBlock::List(list), ContentBlock::SectionBreak, ContentBlock::Paragraph(p)] => {
                assert_eq!(list.len(), 4);
                assert_eq!(p.display_text(), "- e");
            }
            other => panic!("expected list, break, paragraph; got {other:?}"),
        }
        assert_eq!(out.stats.lists_retained, 1);
        assert_eq!(out.stats.lists_collapsed, 1);
    }

    #[test]
    fn test_early_colon_collapses_list() {
        let options = ParseOptions::default();
        let out = build_text(
            "- Speed: fast\n- Cost: low\n- Risk: none\n- Scope: wide",
            &options,
        );
        assert_eq!(out.root.content.len(), 4);
        assert!(out
            .root
            .content
            .iter()
            .all(|b| matches!(b, ContentBlock::Paragraph(_))));
    }

    #[test]
    fn test_numbered_list_always_kept() {
        let options = ParseOptions::default();
        let out = build_text("1. apples.\n2. pears.", &options);
        match &out.root.content[0] {
            ContentBlock::List(list) => {
                assert!(list.ordered);
                assert_eq!(list.items[1].number.as_ref().map(|n| n.raw.as_str()), Some("2."));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_alone_keeps_list_open() {
        let options = ParseOptions::default();
        let out = build_text("- a\n- b\n\n- c\n- d", &options);
        assert_eq!(out.root.content.len(), 1);

        let closed = build_text("- a\n- b\n\nProse here.\n- c\n- d", &options);
        assert_eq!(closed.stats.lists_collapsed, 2);
    }

    #[test]
    fn test_list_continuation() {
        let options = ParseOptions::default();
        let out = build_text(
            "1. first item that\n   wraps onto a second line.\n2. second.",
            &options,
        );
        match &out.root.content[0] {
            ContentBlock::List(list) => {
                assert_eq!(list.items.len(), 2);
                assert_eq!(list.items[0].text, "first item that wraps onto a second line.");
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_table_with_header() {
        let options = ParseOptions::default();
        let out = build_text("| Name | Age |\n|---|---|\n| Ann | 31 |\nAfter.", &options);
        match &out.root.content[0] {
            ContentBlock::Table(table) => {
                assert!(table.header);
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.columns, 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_lone_separator_is_consumed() {
        let options = ParseOptions::default();
        let out = build_text("|---|---|\nText.", &options);
        assert_eq!(out.root.content.len(), 1);
        assert!(matches!(out.root.content[0], ContentBlock::Paragraph(_)));
    }

    #[test]
    fn test_page_break_collapse() {
        let options = ParseOptions::default();
        let text = format!(
            "Title page text.\n{}\nCONCLUSION\nREFERENCES\nSmith, J. (2020). A study.",
            long_filler(520)
        );
        let out = build_text(&text, &options);
        let conclusion = &out.root.children[0];
        assert_eq!(conclusion.heading.as_deref(), Some("CONCLUSION"));
        let breaks = conclusion.content.iter().filter(|b| b.is_page_break()).count();
        assert_eq!(breaks, 1);
        assert_eq!(out.stats.forced_page_breaks, 2);
    }

    #[test]
    fn test_short_document_suppresses_breaks() {
        let options = ParseOptions::default();
        let out = build_text("Intro text.\nCONCLUSION\nDone.\nREFERENCES\nA ref.", &options);
        assert_eq!(out.stats.forced_page_breaks, 0);
        assert_eq!(out.stats.suppressed_page_breaks, 2);
    }

    #[test]
    fn test_numbered_subsection_gets_no_break() {
        let options = ParseOptions::default();
        let text = format!("{}\n2.1 Literature Review\nBody.", long_filler(600));
        let out = build_text(&text, &options);
        assert_eq!(out.stats.forced_page_breaks, 0);
    }

    #[test]
    fn test_chapter_title_attached() {
        let options = ParseOptions::default();
        let text = format!(
            "{}\nCHAPTER ONE\nINTRODUCTION\n1.1 Background\nBody text.",
            long_filler(600)
        );
        let out = build_text(&text, &options);
        let chapter = &out.root.children[0];
        assert_eq!(chapter.kind, SectionKind::Chapter);
        assert_eq!(chapter.subtitle.as_deref(), Some("INTRODUCTION"));
        assert_eq!(chapter.children[0].display_heading().as_deref(), Some("1.1 Background"));
        assert_eq!(out.stats.forced_page_breaks, 1);
    }

    #[test]
    fn test_references_and_definitions() {
        let options = ParseOptions::default();
        let out = build_text(
            "Note: values are rounded.\nREFERENCES\nSmith, J. (2020). A study.",
            &options,
        );
        match &out.root.content[0] {
            ContentBlock::Paragraph(p) => assert_eq!(p.role, ParagraphRole::Definition(5)),
            other => panic!("expected paragraph, got {other:?}"),
        }
        let refs = &out.root.children[0];
        assert_eq!(refs.kind, SectionKind::References);
        match &refs.content[0] {
            ContentBlock::Paragraph(p) => assert_eq!(p.role, ParagraphRole::Reference),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_page_breaks_collapse() {
        let options = ParseOptions::default();
        let out = build_text("One.\n[PAGE BREAK]\n\u{000C}\nTwo.", &options);
        let breaks = out.root.content.iter().filter(|b| b.is_page_break()).count();
        assert_eq!(breaks, 1);
        assert_eq!(out.stats.explicit_page_breaks, 1);
    }
}
