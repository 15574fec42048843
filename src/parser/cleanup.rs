//! Input text cleanup applied before line classification.
//!
//! Cleanup works line-preserving: it never merges or splits lines and never
//! collapses runs of spaces, since whitespace-aligned tables depend on them.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static PAGE_NUMBER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-–—]?[ \t]*\d{1,4}[ \t]*[-–—]?[ \t]*$").unwrap());

static PAGE_OF_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t]*page[ \t]+\d+([ \t]+of[ \t]+\d+)?[ \t]*$").unwrap());

static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z])-\n([a-z])").unwrap());

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

const BULLETS: &[char] = &['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻', '◦'];

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Line endings, BOM and Unicode NFC only
    Minimal,
    /// Minimal plus ligatures, bullets, replacement characters and page numbers
    #[default]
    Standard,
    /// Standard plus PUA removal and hyphenation repair
    Aggressive,
}

impl CleanupPreset {
    /// Parse a preset name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(CleanupPreset::Minimal),
            "standard" => Some(CleanupPreset::Standard),
            "aggressive" => Some(CleanupPreset::Aggressive),
            _ => None,
        }
    }
}

/// Options for input cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Convert CRLF and lone CR to LF
    pub normalize_line_endings: bool,

    /// Strip a leading byte order mark
    pub strip_bom: bool,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (ﬁ, ﬂ, etc.)
    pub fix_ligatures: bool,

    /// Replace non-breaking spaces with plain spaces
    pub replace_nbsp: bool,

    /// Standardize bullet characters (●, ○, ■ → •). Collapsed lists then
    /// lose the source's literal marker, so only the aggressive preset sets it.
    pub standardize_bullets: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Blank out lines holding only a page number
    pub remove_page_numbers: bool,

    /// Join words hyphenated across a line break
    pub fix_hyphenation: bool,

    /// Strip trailing whitespace on every line
    pub trim_trailing_whitespace: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_line_endings: true,
            strip_bom: true,
            normalize_unicode: true,
            fix_ligatures: false,
            replace_nbsp: false,
            standardize_bullets: false,
            remove_replacement_char: false,
            remove_pua: false,
            remove_page_numbers: false,
            fix_hyphenation: false,
            trim_trailing_whitespace: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            fix_ligatures: true,
            replace_nbsp: true,
            remove_replacement_char: true,
            remove_page_numbers: true,
            ..Self::minimal()
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            fix_hyphenation: true,
            standardize_bullets: true,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.strip_bom {
            if let Some(stripped) = result.strip_prefix('\u{FEFF}') {
                result = stripped.to_string();
            }
        }

        if self.options.normalize_line_endings {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                if result.contains(*ligature) {
                    result = result.replace(*ligature, replacement);
                }
            }
        }

        if self.options.replace_nbsp {
            result = result.replace(['\u{00A0}', '\u{202F}'], " ");
        }

        if self.options.standardize_bullets {
            result = result.replace(BULLETS, "•");
        }

        if self.options.remove_pua {
            result = remove_pua_chars(&result);
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.fix_hyphenation {
            result = HYPHENATED_BREAK.replace_all(&result, "$1$2").to_string();
        }

        if self.options.remove_page_numbers || self.options.trim_trailing_whitespace {
            result = result
                .split('\n')
                .map(|line| self.clean_line(line))
                .collect::<Vec<_>>()
                .join("\n");
        }

        result
    }

    fn clean_line<'a>(&self, line: &'a str) -> &'a str {
        if self.options.remove_page_numbers
            && (PAGE_NUMBER_LINE.is_match(line) || PAGE_OF_LINE.is_match(line))
        {
            return "";
        }
        if self.options.trim_trailing_whitespace {
            // Form feeds carry page breaks and must survive.
            return line.trim_end_matches([' ', '\t']);
        }
        line
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn remove_pua_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}
