//! End-to-end tests: raw text through classification, structure and rendering.

use prosemark::model::{ContentBlock, LineType, Section};
use prosemark::render::{to_markdown, to_text, RenderOptions};
use prosemark::{process_text, process_text_with_options, NumberingPolicy, ParseOptions};

fn filler(words: usize) -> String {
    vec!["word"; words].join(" ") + "."
}

fn headings(root: &Section) -> Vec<String> {
    let mut out = Vec::new();
    root.walk(&mut |s| {
        if let Some(h) = s.display_heading() {
            out.push(h);
        }
    });
    out
}

fn markdown(text: &str) -> String {
    to_markdown(&process_text(text), &RenderOptions::default()).unwrap()
}

#[test]
fn test_existing_numbers_are_never_doubled() {
    let text = "1.1 Background\nSome body text.\n1.2 Scope\nMore text.\n2.0 Method Overview\nMethod text.";
    for policy in [NumberingPolicy::Auto, NumberingPolicy::Always] {
        let doc = process_text_with_options(text, ParseOptions::new().with_numbering(policy));
        assert_eq!(
            headings(&doc.root),
            vec!["1.1 Background", "1.2 Scope", "2.0 Method Overview"],
            "{policy:?}"
        );
        assert_eq!(doc.stats.synthesized_numbers, 0);
        assert_eq!(doc.stats.existing_numbers, 3);
    }
}

#[test]
fn test_synthesized_numbers_are_monotonic() {
    let text = "INTRODUCTION\nText.\nMETHODS\nText.\n## Sampling\nText.\n## Instruments\nText.\nRESULTS\nText.\nDISCUSSION\nText.";
    let doc = process_text(text);
    assert!(doc.metadata.numbering_synthesized);
    assert_eq!(
        headings(&doc.root),
        vec![
            "1. INTRODUCTION",
            "2. METHODS",
            "2.1 Sampling",
            "2.2 Instruments",
            "3. RESULTS",
            "4. DISCUSSION",
        ]
    );
    assert_eq!(doc.stats.synthesized_numbers, 6);
}

#[test]
fn test_inserted_subsection_does_not_disturb_siblings() {
    let plain = process_text("Introduction\nBackground\nMethods\nResults");
    assert_eq!(
        headings(&plain.root),
        vec!["1. Introduction", "2. Background", "3. Methods", "4. Results"]
    );

    let nested = process_text("Introduction\nBackground\n## Prior Work\nMethods\nResults");
    assert_eq!(
        headings(&nested.root),
        vec![
            "1. Introduction",
            "2. Background",
            "2.1 Prior Work",
            "3. Methods",
            "4. Results",
        ]
    );
}

#[test]
fn test_never_policy_leaves_headings_bare() {
    let text = "INTRODUCTION\nText.\nMETHODS\nText.\nRESULTS\nText.";
    let doc = process_text_with_options(
        text,
        ParseOptions::new().with_numbering(NumberingPolicy::Never),
    );
    assert_eq!(headings(&doc.root), vec!["INTRODUCTION", "METHODS", "RESULTS"]);
    assert!(!doc.metadata.numbering_synthesized);
}

#[test]
fn test_list_with_long_item_collapses() {
    let long = vec!["detail"; 35].join(" ");
    let text = format!("- alpha\n- beta\n- {}\n- delta", long);
    let doc = process_text(&text);
    assert_eq!(doc.root.content.len(), 4);
    assert!(doc
        .root
        .content
        .iter()
        .all(|b| matches!(b, ContentBlock::Paragraph(_))));
    assert_eq!(doc.stats.lists_collapsed, 1);
}

#[test]
fn test_short_list_of_four_is_kept() {
    let doc = process_text("- alpha\n- beta\n- gamma\n- delta");
    match &doc.root.content[..] {
        [ContentBlock::List(list)] => assert_eq!(list.items.len(), 4),
        other => panic!("expected one list, got {other:?}"),
    }
    assert_eq!(
        markdown("- alpha\n- beta\n- gamma\n- delta"),
        "- alpha\n- beta\n- gamma\n- delta\n"
    );
}

#[test]
fn test_list_of_three_collapses() {
    let doc = process_text("- alpha\n- beta\n- gamma");
    assert_eq!(doc.stats.lists_collapsed, 1);
    assert_eq!(doc.stats.lists_retained, 0);
    assert_eq!(doc.root.content.len(), 3);
}

#[test]
fn test_tab_separated_table() {
    let text = "Name\tAge\tCity\nJohn\t25\tLondon\nMary\t31\tParis";
    let doc = process_text(text);
    assert_eq!(doc.stats.lines_of(LineType::TableRow), 3);
    match &doc.root.content[..] {
        [ContentBlock::Table(table)] => {
            assert_eq!(table.rows.len(), 3);
            assert_eq!(table.columns, 3);
            assert_eq!(table.rows[1], vec!["John", "25", "London"]);
        }
        other => panic!("expected one table, got {other:?}"),
    }

    let md = markdown(text);
    assert!(md.starts_with("| Name | Age | City |\n| John | 25 | London |"));

    let plain = to_text(&doc, &RenderOptions::default()).unwrap();
    let rows: Vec<&str> = plain.lines().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].find("Age"), rows[1].find("25"));
}

#[test]
fn test_markdown_round_trip_is_stable() {
    let text = "INTRODUCTION\n\
                The **key** point comes first.\n\
                METHODS\n\
                ## Sampling\n\
                1. apples.\n\
                2. pears.\n\
                RESULTS\n\
                - alpha\n\
                - beta\n\
                - gamma\n\
                - delta\n\
                Name\tAge\tCity\n\
                John\t25\tLondon\n\
                Mary\t31\tParis";
    let first = markdown(text);
    let second = markdown(&first);
    assert_eq!(first, second);

    let first_doc = process_text(&first);
    let second_doc = process_text(&second);
    assert_eq!(headings(&first_doc.root), headings(&second_doc.root));
    assert_eq!(first_doc.stats.line_types, second_doc.stats.line_types);
    assert!(first.contains("# 1. INTRODUCTION"));
    assert!(first.contains("## 2.1 Sampling"));
    assert!(first.contains("**1.** apples."));
}

#[test]
fn test_conclusion_then_references_has_one_break() {
    let text = format!(
        "Opening text.\n{}\nCONCLUSION\nREFERENCES\nSmith, J. (2020). A study.",
        filler(520)
    );
    let md = markdown(&text);

    let conclusion = md.find("# CONCLUSION").unwrap();
    let references = md.find("# REFERENCES").unwrap();
    assert_eq!(md[conclusion..references].matches("[PAGE BREAK]").count(), 1);
    assert_eq!(md[..conclusion].matches("[PAGE BREAK]").count(), 1);
}

#[test]
fn test_explicit_break_before_heading_is_not_doubled() {
    let text = format!(
        "{}\nCONCLUSION\nWe conclude.\n[PAGE BREAK]\n\nREFERENCES\nSmith, J. (2020). A study.",
        filler(520)
    );
    let md = markdown(&text);
    let conclusion = md.find("# CONCLUSION").unwrap();
    let references = md.find("# REFERENCES").unwrap();
    assert_eq!(md[conclusion..references].matches("[PAGE BREAK]").count(), 1);
}

#[test]
fn test_short_document_has_no_breaks() {
    let md = markdown("Opening text.\nCONCLUSION\nDone.\nREFERENCES\nA ref.");
    assert!(!md.contains("[PAGE BREAK]"));
    let doc = process_text("Opening text.\nCONCLUSION\nDone.\nREFERENCES\nA ref.");
    assert!(doc.metadata.is_short);
    assert_eq!(doc.stats.suppressed_page_breaks, 2);
}

#[test]
fn test_page_breaks_disabled() {
    let text = format!("{}\nCONCLUSION\nREFERENCES\nA ref.", filler(520));
    let doc = process_text_with_options(&text, ParseOptions::new().with_page_breaks(false));
    assert_eq!(doc.stats.forced_page_breaks, 0);
    let md = to_markdown(&doc, &RenderOptions::default()).unwrap();
    assert!(!md.contains("[PAGE BREAK]"));
}

#[test]
fn test_form_feed_becomes_page_break() {
    let doc = process_text("First page.\u{000C}Second page.");
    assert_eq!(doc.stats.explicit_page_breaks, 1);
    let plain = to_text(&doc, &RenderOptions::default()).unwrap();
    assert_eq!(plain, "First page.\n\n\u{000C}\n\nSecond page.\n");
}

#[test]
fn test_toc_lists_outline() {
    let text = format!("INTRODUCTION\n{}\nMETHODS\nText.\nRESULTS\nText.", filler(520));
    let options = RenderOptions::default().with_toc(true);
    let md = to_markdown(&process_text(&text), &options).unwrap();
    assert!(md.starts_with(
        "**TABLE OF CONTENTS**\n\n- 1. INTRODUCTION\n- 2. METHODS\n- 3. RESULTS"
    ));
}

#[test]
fn test_tab_table_keeps_empty_cells() {
    let text = "Name\tAge\tCity\nJohn\t\tLondon\nMary\t31\tParis";
    let doc = process_text(text);
    assert_eq!(doc.stats.lines_of(LineType::TableRow), 3);
    match &doc.root.content[..] {
        [ContentBlock::Table(table)] => {
            assert_eq!(table.columns, 3);
            assert_eq!(table.rows[1], vec!["John", "", "London"]);
            assert_eq!(table.rows[2], vec!["Mary", "31", "Paris"]);
        }
        other => panic!("expected one table, got {other:?}"),
    }
}

#[test]
fn test_lowercase_subheadings_round_trip() {
    let first = markdown("## alpha\n## beta\n## gamma");
    let first_doc = process_text(&first);
    assert_eq!(headings(&first_doc.root), vec!["1.1 alpha", "1.2 beta", "1.3 gamma"]);
    assert_eq!(first_doc.stats.synthesized_numbers, 0);

    let second = markdown(&first);
    assert_eq!(first, second);
    assert_eq!(headings(&first_doc.root), headings(&process_text(&second).root));
}

#[test]
fn test_mixed_depth_lowercase_round_trip() {
    let text = "# overview\nText.\n## alpha\nText.\n## beta\nText.\n# methods\nText.";
    let first = markdown(text);
    let second = markdown(&first);
    assert_eq!(first, second);
    assert_eq!(
        headings(&process_text(&second).root),
        vec!["1. overview", "1.1 alpha", "1.2 beta", "2. methods"]
    );
}

#[test]
fn test_numbered_markdown_headings_under_always() {
    let text = "## 1.1 background of the study\nText.\n## 1.2 scope\nText.";
    let doc = process_text_with_options(
        text,
        ParseOptions::new().with_numbering(NumberingPolicy::Always),
    );
    assert_eq!(headings(&doc.root), vec!["1.1 background of the study", "1.2 scope"]);
    assert_eq!(doc.stats.synthesized_numbers, 0);
}

#[test]
fn test_numbered_bold_headings_keep_their_numbers() {
    let doc = process_text("**1.1 background**\nText.\n**1.2 scope**\nText.\n**1.3 aims**");
    assert_eq!(headings(&doc.root), vec!["1.1 background", "1.2 scope", "1.3 aims"]);
    assert_eq!(doc.stats.existing_numbers, 3);
}

#[test]
fn test_decimal_prose_stays_paragraph() {
    let doc = process_text("3.5 million people live there.\nSome more text.");
    assert_eq!(doc.stats.lines_of(LineType::NumberedHeading), 0);
    assert!(headings(&doc.root).is_empty());
}

#[test]
fn test_collapsed_list_keeps_source_marker() {
    let doc = process_text("○ alpha\n○ beta\n○ gamma");
    assert_eq!(doc.stats.lists_collapsed, 1);
    match &doc.root.content[0] {
        ContentBlock::Paragraph(p) => assert_eq!(p.display_text(), "○ alpha"),
        other => panic!("expected paragraph, got {other:?}"),
    }
}
