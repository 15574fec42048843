//! Table row detection for pipe-delimited and whitespace-aligned text.
//!
//! A pipe row (`| a | b |`) is recognized on its own. A whitespace-aligned
//! row needs at least two column gaps (a tab or a run of two or more spaces)
//! and a neighboring row with the same column layout; a lone line with wide
//! spacing is justified prose, not a table.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-{1,}:?$").unwrap());

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of column gaps in a whitespace-aligned row
    pub min_gaps: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Maximum words in a single cell (above this, likely prose)
    pub max_cell_words: usize,
    /// Column start tolerance in characters for space-aligned rows
    pub alignment_tolerance: usize,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_gaps: 2,
            max_columns: 8,
            max_cell_words: 8,
            alignment_tolerance: 2,
        }
    }
}

/// A pipe-delimited row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeRow {
    /// Cell texts
    pub cells: Vec<String>,
    /// Markdown separator row (`|---|:---:|`)
    pub separator: bool,
}

/// A line split at its column gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSplit {
    /// Cell texts
    pub cells: Vec<String>,
    /// Character offset where each cell starts
    pub starts: Vec<usize>,
    /// The line uses tabs as column gaps
    pub tabbed: bool,
}

impl ColumnSplit {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the split has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Detects table rows in text lines.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Parse a pipe-delimited row. Rows that open with `|` but do not close
    /// with one are malformed and yield `None`.
    pub fn parse_pipe_row(&self, line: &str) -> Option<PipeRow> {
        let trimmed = line.trim();
        if trimmed.len() < 3 || !trimmed.starts_with('|') || !trimmed.ends_with('|') {
            return None;
        }

        let inner = &trimmed[1..trimmed.len() - 1];
        let cells: Vec<String> = inner.split('|').map(|c| c.trim().to_string()).collect();

        let separator = cells.iter().all(|c| SEPARATOR_CELL.is_match(c));
        if !separator && cells.iter().all(|c| c.is_empty()) {
            return None;
        }
        if cells.len() > self.config.max_columns {
            log::debug!(
                "TableDetector: pipe row rejected, too many columns ({} > {})",
                cells.len(),
                self.config.max_columns
            );
            return None;
        }

        Some(PipeRow { cells, separator })
    }

    /// Split a line at tabs and runs of two or more spaces.
    ///
    /// Every tab is a column boundary of its own, so `a\t\tb` has an empty
    /// middle cell. Runs of spaces coalesce into one gap. Returns `None`
    /// unless the line has at least `min_gaps` gaps and passes the cell
    /// plausibility checks.
    pub fn split_columns(&self, line: &str) -> Option<ColumnSplit> {
        let split = if line.contains('\t') {
            split_at_tabs(line)
        } else {
            split_at_space_runs(line.trim_end())
        };

        if split.len() < self.config.min_gaps + 1 {
            return None;
        }
        if self.is_plausible(&split) {
            Some(split)
        } else {
            None
        }
    }

    /// Whether two splits share the same column layout.
    pub fn is_aligned(&self, a: &ColumnSplit, b: &ColumnSplit) -> bool {
        if a.len() != b.len() {
            return false;
        }
        if a.tabbed || b.tabbed {
            return true;
        }
        a.starts
            .iter()
            .zip(&b.starts)
            .all(|(x, y)| x.abs_diff(*y) <= self.config.alignment_tolerance)
    }

    /// Whether column starts recorded for a previous row match a split.
    pub fn matches_columns(&self, columns: &[usize], tabbed: bool, split: &ColumnSplit) -> bool {
        if columns.len() != split.len() {
            return false;
        }
        if tabbed || split.tabbed {
            return true;
        }
        columns
            .iter()
            .zip(&split.starts)
            .all(|(x, y)| x.abs_diff(*y) <= self.config.alignment_tolerance)
    }

    fn is_plausible(&self, split: &ColumnSplit) -> bool {
        if split.len() > self.config.max_columns {
            log::debug!(
                "TableDetector: row rejected, too many columns ({} > {})",
                split.len(),
                self.config.max_columns
            );
            return false;
        }

        let filled = split.cells.iter().filter(|c| !c.is_empty()).count();
        if filled < 2 {
            log::debug!("TableDetector: row rejected, only {} filled cells", filled);
            return false;
        }

        if let Some(first) = split.cells.first() {
            if is_list_marker(first) {
                log::debug!("TableDetector: row rejected, leading list marker {:?}", first);
                return false;
            }
        }

        let longest = split
            .cells
            .iter()
            .map(|c| c.split_whitespace().count())
            .max()
            .unwrap_or(0);
        if longest > self.config.max_cell_words {
            log::debug!(
                "TableDetector: row rejected, cell of {} words reads as prose",
                longest
            );
            return false;
        }

        true
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "►" | "■" | "●" | "□" | "◆" | "◇"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

fn split_at_tabs(line: &str) -> ColumnSplit {
    let line = line
        .trim_start_matches(' ')
        .trim_end_matches(|c: char| c.is_whitespace() && c != '\t');
    let mut cells = Vec::new();
    let mut starts = Vec::new();
    let mut offset = 0;
    for part in line.split('\t') {
        let lead = part.chars().take_while(|c| c.is_whitespace()).count();
        cells.push(part.trim().to_string());
        starts.push(offset + lead);
        offset += part.chars().count() + 1;
    }
    ColumnSplit {
        cells,
        starts,
        tabbed: true,
    }
}

fn split_at_space_runs(line: &str) -> ColumnSplit {
    let chars: Vec<char> = line.chars().collect();
    let mut cells = Vec::new();
    let mut starts = Vec::new();
    let mut current = String::new();
    let mut current_start = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == ' ' && chars.get(i + 1) == Some(&' ') {
            if let Some(start) = current_start.take() {
                cells.push(std::mem::take(&mut current).trim().to_string());
                starts.push(start);
            }
            i += chars[i..].iter().take_while(|c| **c == ' ').count();
            continue;
        }
        if current_start.is_none() {
            if c == ' ' {
                i += 1;
                continue;
            }
            current_start = Some(i);
        }
        current.push(c);
        i += 1;
    }
    if let Some(start) = current_start {
        cells.push(current.trim().to_string());
        starts.push(start);
    }

    ColumnSplit {
        cells,
        starts,
        tabbed: false,
    }
}

/// Check if a text string looks like a list marker (number, bullet, etc.).
fn is_list_marker(text: &str) -> bool {
    is_bullet_marker(text) || is_number_marker(text)
}
