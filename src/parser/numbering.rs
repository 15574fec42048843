//! Heading numbering.
//!
//! Running counters live in an explicit [`HeadingNumberingState`] that is
//! passed into [`number_heading`] and returned with the outcome; no state is
//! shared between documents.

use crate::model::{ClassifiedLine, LineClass, NumberingToken};

use super::options::NumberingPolicy;

/// Deepest heading level tracked.
pub const MAX_DEPTH: usize = 6;

/// Running hierarchical counters for one processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadingNumberingState {
    /// One counter per level (chapter, section, subsection, ...)
    pub counters: [u32; MAX_DEPTH],
    /// Depth of the previous heading (0 before the first heading)
    pub last_depth: u8,
    /// Whether unnumbered headings get a synthesized number
    pub synthesize: bool,
}

impl HeadingNumberingState {
    /// Create a fresh state.
    pub fn new(synthesize: bool) -> Self {
        Self {
            synthesize,
            ..Self::default()
        }
    }

    /// Counters up to and including `depth`.
    pub fn levels(&self, depth: u8) -> Vec<u32> {
        self.counters[..clamp_depth(depth) as usize].to_vec()
    }

    fn reset_below(&mut self, depth: u8) {
        for counter in self.counters.iter_mut().skip(clamp_depth(depth) as usize) {
            *counter = 0;
        }
    }
}

/// A heading handed to the numberer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingRequest<'a> {
    /// Heading text without any number
    pub text: &'a str,
    /// Number already carried by the source line
    pub existing: Option<&'a NumberingToken>,
    /// Depth implied by the line itself
    pub depth_hint: Option<u8>,
    /// Chapter number from a chapter label
    pub chapter: Option<u32>,
}

impl<'a> HeadingRequest<'a> {
    /// Build a request from a classified heading line.
    pub fn from_line(line: &'a ClassifiedLine) -> Self {
        match &line.class {
            LineClass::NumberedHeading { number } => Self {
                text: &line.text,
                existing: Some(number),
                depth_hint: None,
                chapter: None,
            },
            LineClass::Heading {
                depth_hint,
                chapter,
                ..
            } => Self {
                text: &line.text,
                existing: None,
                depth_hint: *depth_hint,
                chapter: chapter.map(|c| c.number),
            },
            _ => Self {
                text: &line.text,
                ..Self::default()
            },
        }
    }
}

/// Result of numbering one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingOutcome {
    /// Heading as displayed, number included
    pub numbered: String,
    /// Number shown with the heading
    pub number: Option<NumberingToken>,
    /// Whether the number was synthesized
    pub was_renumbered: bool,
    /// Hierarchical depth of the heading
    pub depth: u8,
    /// State after this heading
    pub new_state: HeadingNumberingState,
}

/// Number one heading.
///
/// An existing number is accepted verbatim, even when it repeats or goes
/// backwards, and the counters continue from it. Otherwise, when synthesis
/// is enabled, the counter at the inferred depth is incremented and deeper
/// counters reset. A heading never receives a second number.
pub fn number_heading(
    request: &HeadingRequest<'_>,
    state: HeadingNumberingState,
) -> NumberingOutcome {
    let mut state = state;

    if let Some(existing) = request.existing {
        let depth = clamp_depth(existing.depth());
        for (slot, value) in state.counters.iter_mut().zip(&existing.levels) {
            *slot = *value;
        }
        state.reset_below(depth);
        state.last_depth = depth;
        return NumberingOutcome {
            numbered: join_label(&existing.raw, request.text),
            number: Some(existing.clone()),
            was_renumbered: false,
            depth,
            new_state: state,
        };
    }

    if let Some(chapter) = request.chapter {
        // The label itself is the visible number.
        state.counters[0] = chapter;
        state.reset_below(1);
        state.last_depth = 1;
        return NumberingOutcome {
            numbered: request.text.to_string(),
            number: None,
            was_renumbered: false,
            depth: 1,
            new_state: state,
        };
    }

    let depth = clamp_depth(
        request
            .depth_hint
            .unwrap_or(if state.last_depth == 0 { 1 } else { state.last_depth }),
    );
    state.last_depth = depth;

    if !state.synthesize {
        return NumberingOutcome {
            numbered: request.text.to_string(),
            number: None,
            was_renumbered: false,
            depth,
            new_state: state,
        };
    }

    let idx = depth as usize - 1;
    // A heading deeper than any seen so far promotes empty parents to 1.
    for counter in state.counters.iter_mut().take(idx) {
        if *counter == 0 {
            *counter = 1;
        }
    }
    state.counters[idx] = state.counters[idx].saturating_add(1);
    state.reset_below(depth);

    let token = NumberingToken::synthesized(state.levels(depth));
    NumberingOutcome {
        numbered: join_label(&token.raw, request.text),
        number: Some(token),
        was_renumbered: true,
        depth,
        new_state: state,
    }
}

/// Decide whether unnumbered headings get synthesized numbers.
///
/// `Auto` synthesizes only when no heading carries an explicit number (a
/// chapter label counts as one) and there are at least three headings.
pub fn should_synthesize(policy: NumberingPolicy, lines: &[ClassifiedLine]) -> bool {
    match policy {
        NumberingPolicy::Always => true,
        NumberingPolicy::Never => false,
        NumberingPolicy::Auto => {
            let mut headings = 0;
            for line in lines {
                match &line.class {
                    LineClass::NumberedHeading { .. } => return false,
                    LineClass::Heading {
                        chapter: Some(_), ..
                    } => return false,
                    LineClass::Heading { .. } => headings += 1,
                    _ => {}
                }
            }
            headings >= 3
        }
    }
}

fn join_label(label: &str, text: &str) -> String {
    if text.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", label, text)
    }
}

fn clamp_depth(depth: u8) -> u8 {
    depth.clamp(1, MAX_DEPTH as u8)
}
