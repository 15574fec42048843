//! Rendering options and configuration.

use crate::error::{Error, Result};
use crate::parser::{NumberingPolicy, ParseOptions};
use serde::{Deserialize, Serialize};

/// Visual style of one heading depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingStyle {
    /// Font size in points
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Centered instead of left-aligned
    pub centered: bool,
}

impl HeadingStyle {
    /// Create a bold, left-aligned style of the given size.
    pub fn new(size: f32) -> Self {
        Self {
            size,
            bold: true,
            italic: false,
            centered: false,
        }
    }

    /// Center the heading.
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// Set italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Default heading style table, indexed by depth - 1.
pub fn default_heading_styles() -> Vec<HeadingStyle> {
    vec![
        HeadingStyle::new(16.0).centered(),
        HeadingStyle::new(14.0),
        HeadingStyle::new(13.0),
        HeadingStyle::new(12.0).italic(),
    ]
}

/// Options for rendering a section tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Body font family
    pub font_family: String,

    /// Body font size in points
    pub font_size: f32,

    /// Line spacing multiplier
    pub line_spacing: f32,

    /// Page margin in inches
    pub margin_inches: f32,

    /// Emit a table of contents before the body
    pub include_toc: bool,

    /// Title of the table of contents
    pub toc_title: String,

    /// Character for retained bullet lists
    pub bullet: char,

    /// Heading style per depth; deeper headings reuse the last entry
    pub heading_styles: Vec<HeadingStyle>,

    /// Marker line written for page breaks in Markdown
    pub page_break_marker: String,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the body font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the line spacing.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the page margin in inches.
    pub fn with_margin(mut self, inches: f32) -> Self {
        self.margin_inches = inches;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    /// Set the bullet character.
    pub fn with_bullet(mut self, bullet: char) -> Self {
        self.bullet = bullet;
        self
    }

    /// Replace the heading style table.
    pub fn with_heading_styles(mut self, styles: Vec<HeadingStyle>) -> Self {
        if !styles.is_empty() {
            self.heading_styles = styles;
        }
        self
    }

    /// Set the page break marker line.
    pub fn with_page_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.page_break_marker = marker.into();
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Style for a heading depth (1-based).
    pub fn heading_style(&self, depth: u8) -> HeadingStyle {
        let idx = (depth.max(1) as usize - 1).min(self.heading_styles.len().saturating_sub(1));
        self.heading_styles
            .get(idx)
            .copied()
            .unwrap_or_else(|| HeadingStyle::new(self.font_size))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            font_size: 12.0,
            line_spacing: 1.5,
            margin_inches: 1.0,
            include_toc: false,
            toc_title: "TABLE OF CONTENTS".to_string(),
            bullet: '•',
            heading_styles: default_heading_styles(),
            page_break_marker: "[PAGE BREAK]".to_string(),
            include_frontmatter: false,
        }
    }
}

/// Formatting options record as supplied by a request layer.
///
/// Deserializes from JSON with every field optional, then validates into
/// [`ParseOptions`] and [`RenderOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Body font size in points (8-72)
    pub font_size: f32,
    /// Line spacing multiplier (1.0-3.0)
    pub line_spacing: f32,
    /// Page margin in inches (0.25-3.0)
    pub margin: f32,
    /// Emit a table of contents
    pub include_toc: bool,
    /// Numbering policy name: "auto", "always" or "never"
    pub numbering: String,
    /// Insert forced page breaks
    pub page_breaks: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            line_spacing: 1.5,
            margin: 1.0,
            include_toc: false,
            numbering: "auto".to_string(),
            page_breaks: true,
        }
    }
}

impl FormatOptions {
    /// Parse an options record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: FormatOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_range("font_size", self.font_size, 8.0, 72.0)?;
        check_range("line_spacing", self.line_spacing, 1.0, 3.0)?;
        check_range("margin", self.margin, 0.25, 3.0)?;
        self.numbering_policy()?;
        Ok(())
    }

    /// The parsed numbering policy.
    pub fn numbering_policy(&self) -> Result<NumberingPolicy> {
        NumberingPolicy::parse(&self.numbering).ok_or_else(|| {
            Error::InvalidOption(format!(
                "numbering must be auto, always or never, got {:?}",
                self.numbering
            ))
        })
    }

    /// Validate and apply to a base set of options.
    pub fn apply(
        &self,
        parse: ParseOptions,
        render: RenderOptions,
    ) -> Result<(ParseOptions, RenderOptions)> {
        self.validate()?;
        let parse = parse
            .with_numbering(self.numbering_policy()?)
            .with_page_breaks(self.page_breaks);
        let render = render
            .with_font_size(self.font_size)
            .with_line_spacing(self.line_spacing)
            .with_margin(self.margin)
            .with_toc(self.include_toc);
        Ok((parse, render))
    }

    /// Validate and convert into default-based options.
    pub fn into_options(&self) -> Result<(ParseOptions, RenderOptions)> {
        self.apply(ParseOptions::default(), RenderOptions::default())
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidOption(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}
