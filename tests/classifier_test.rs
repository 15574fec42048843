//! Integration tests for line classification.

use prosemark::model::{LineClass, LineType};
use prosemark::parser::rule_names;
use prosemark::render::{lines_to_json, JsonFormat};
use prosemark::{analyze_text, LineClassifier, ParseOptions};

fn types(text: &str) -> Vec<LineType> {
    analyze_text(text, &ParseOptions::default())
        .iter()
        .map(|l| l.line_type())
        .collect()
}

#[test]
fn test_academic_document_line_types() {
    let text = "CHAPTER ONE\n\
                INTRODUCTION\n\
                1.1 Background of the Study\n\
                Education has changed a great deal.\n\
                \n\
                Table 1: Respondents by age\n\
                - first point\n\
                ---\n\
                REFERENCES";
    assert_eq!(
        types(text),
        vec![
            LineType::Heading,
            LineType::Heading,
            LineType::NumberedHeading,
            LineType::Paragraph,
            LineType::Blank,
            LineType::Caption,
            LineType::BulletListItem,
            LineType::SectionBreak,
            LineType::Heading,
        ]
    );
}

#[test]
fn test_every_line_gets_a_rule_name() {
    let known = rule_names();
    let lines = analyze_text(
        "# Title\n**Bold Heading**\n2. Requirements:\n\u{000C}\nplain words here.",
        &ParseOptions::default(),
    );
    for line in &lines {
        assert!(known.contains(&line.rule.as_str()), "{}", line.rule);
        assert!((0.0..=1.0).contains(&line.confidence));
    }
    assert_eq!(lines[0].rule, "markdown_heading");
    assert_eq!(lines[1].rule, "emphasis_wrapper");
    assert_eq!(lines[2].rule, "existing_numbering");
    assert_eq!(lines[3].rule, "page_break");
    assert_eq!(lines[4].rule, "paragraph");
}

#[test]
fn test_custom_keywords() {
    let options = ParseOptions::new().with_keywords(["Project Scope"]);
    let classifier = LineClassifier::new(&options);
    let line = classifier.classify("Project scope:", 0, None, None);
    assert_eq!(
        line.class,
        LineClass::Heading {
            depth_hint: Some(1),
            keyword: true,
            chapter: None
        }
    );

    let default = LineClassifier::default().classify("Project scope:", 0, None, None);
    assert_eq!(default.line_type(), LineType::Paragraph);
}

#[test]
fn test_numbered_run_is_a_list() {
    let lines = analyze_text(
        "Steps to follow:\n1. Open the valve\n2. Wait ten minutes\n3. Close the valve",
        &ParseOptions::default(),
    );
    let items: Vec<LineType> = lines[1..].iter().map(|l| l.line_type()).collect();
    assert_eq!(items, vec![LineType::NumberedListItem; 3]);
    assert_eq!(lines[2].text, "Wait ten minutes");
}

#[test]
fn test_prose_stays_prose() {
    let text = "3.5 million people live there.\n\
                Table 1 shows that most respondents agreed.\n\
                Chapter 2 describes the sampling method.\n\
                -5 degrees was the lowest reading.";
    assert!(types(text).iter().all(|t| *t == LineType::Paragraph));
}

#[test]
fn test_emphasis_is_extracted() {
    let lines = analyze_text("A *very* **bold** claim.", &ParseOptions::default());
    assert_eq!(lines[0].text, "A very bold claim.");
    assert_eq!(lines[0].emphasis.len(), 2);
    assert!(lines[0].emphasis[0].style.is_italic());
    assert!(lines[0].emphasis[1].style.is_bold());
}

#[test]
fn test_lines_to_json() {
    let lines = analyze_text("INTRODUCTION\nBody.", &ParseOptions::default());
    let json = lines_to_json(&lines, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["type"], "heading");
    assert_eq!(value[1]["type"], "paragraph");
    assert_eq!(value[1]["text"], "Body.");
}
