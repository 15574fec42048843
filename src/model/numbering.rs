//! Numbering tokens for headings and list items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeral system of a numbering token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingKind {
    /// 1, 1.2, 1.2.3
    Arabic,
    /// I, II, IV
    Roman,
    /// a, b, C
    Alpha,
}

/// A structured heading or list marker.
///
/// `levels` holds one integer per hierarchy level (`"2.1"` → `[2, 1]`,
/// `"IV."` → `[4]`, `"c)"` → `[3]`); its length is the hierarchical depth.
/// `raw` is the label exactly as it appears in the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingToken {
    /// Numeral system
    pub kind: NumberingKind,

    /// Counter value per hierarchy level
    pub levels: Vec<u32>,

    /// Label text, e.g. `"1.1"`, `"I."`, `"a)"`
    pub raw: String,
}

impl NumberingToken {
    /// Create a token from its parts.
    pub fn new(kind: NumberingKind, levels: Vec<u32>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            levels,
            raw: raw.into(),
        }
    }

    /// Build a synthesized arabic token from running counters.
    ///
    /// Depth 1 renders as `"3."` so that the label is recognized again as an
    /// existing number when the output is fed back in; deeper levels render
    /// dotted (`"3.2"`, `"3.2.1"`).
    pub fn synthesized(levels: Vec<u32>) -> Self {
        let raw = if levels.len() == 1 {
            format!("{}.", levels[0])
        } else {
            levels
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(".")
        };
        Self::new(NumberingKind::Arabic, levels, raw)
    }

    /// Hierarchical depth (number of levels, at least 1).
    pub fn depth(&self) -> u8 {
        self.levels.len().clamp(1, u8::MAX as usize) as u8
    }

    /// Counter value at the deepest level.
    pub fn last(&self) -> u32 {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Whether `next` continues this token as the following sibling.
    pub fn is_followed_by(&self, next: &NumberingToken) -> bool {
        self.kind == next.kind
            && self.levels.len() == next.levels.len()
            && self.levels[..self.levels.len().saturating_sub(1)]
                == next.levels[..next.levels.len().saturating_sub(1)]
            && next.last() == self.last() + 1
    }

    /// Same numeral system and depth; the order of values is not checked.
    pub fn same_shape(&self, other: &NumberingToken) -> bool {
        self.kind == other.kind && self.levels.len() == other.levels.len()
    }
}

impl fmt::Display for NumberingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Convert a number to upper-case Roman numerals.
pub fn to_roman(mut num: u32) -> String {
    let numerals = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, symbol) in numerals {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}

/// Parse a Roman numeral (either case). Returns `None` for malformed input.
pub fn from_roman(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }

    let mut total = 0u32;
    let mut prev = 0u32;
    for c in s.chars().rev() {
        let value = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            prev = value;
        }
    }

    // Reject non-canonical forms such as "IIII" or "VX".
    if total == 0 || !to_roman(total).eq_ignore_ascii_case(s) {
        return None;
    }
    Some(total)
}

/// Position of an ASCII letter in the alphabet (`a`/`A` → 1).
pub fn alpha_value(c: char) -> Option<u32> {
    if c.is_ascii_alphabetic() {
        Some(c.to_ascii_lowercase() as u32 - 'a' as u32 + 1)
    } else {
        None
    }
}

/// Parse a spelled-out or numeric chapter number ("ONE", "2", "IV").
pub fn chapter_number(word: &str) -> Option<u32> {
    const WORDS: [&str; 20] = [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen", "twenty",
    ];

    let word = word.trim_end_matches(['.', ':']);
    if let Ok(n) = word.parse::<u32>() {
        return Some(n);
    }
    let lower = word.to_lowercase();
    if let Some(pos) = WORDS.iter().position(|w| *w == lower) {
        return Some(pos as u32 + 1);
    }
    from_roman(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_round_trip() {
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(2024), "MMXXIV");
        assert_eq!(from_roman("XIV"), Some(14));
        assert_eq!(from_roman("iv"), Some(4));
        assert_eq!(from_roman("IIII"), None);
        assert_eq!(from_roman("ABC"), None);
    }

    #[test]
    fn test_synthesized_labels() {
        assert_eq!(NumberingToken::synthesized(vec![3]).raw, "3.");
        assert_eq!(NumberingToken::synthesized(vec![2, 1]).raw, "2.1");
        assert_eq!(NumberingToken::synthesized(vec![2, 1]).depth(), 2);
    }

    #[test]
    fn test_sibling_sequence() {
        let a = NumberingToken::new(NumberingKind::Alpha, vec![1], "a)");
        let b = NumberingToken::new(NumberingKind::Alpha, vec![2], "b)");
        let one = NumberingToken::new(NumberingKind::Arabic, vec![1], "1.");
        assert!(a.is_followed_by(&b));
        assert!(!b.is_followed_by(&a));
        assert!(!a.is_followed_by(&one));

        let s1 = NumberingToken::new(NumberingKind::Arabic, vec![2, 1], "2.1");
        let s2 = NumberingToken::new(NumberingKind::Arabic, vec![2, 2], "2.2");
        let other = NumberingToken::new(NumberingKind::Arabic, vec![3, 2], "3.2");
        assert!(s1.is_followed_by(&s2));
        assert!(!s1.is_followed_by(&other));
    }

    #[test]
    fn test_chapter_number() {
        assert_eq!(chapter_number("ONE"), Some(1));
        assert_eq!(chapter_number("Three:"), Some(3));
        assert_eq!(chapter_number("4"), Some(4));
        assert_eq!(chapter_number("IV"), Some(4));
        assert_eq!(chapter_number("Summary"), None);
    }
}
