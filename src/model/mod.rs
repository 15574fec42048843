//! Document model types.
//!
//! Data flows strictly forward through these types: raw lines become
//! [`ClassifiedLine`]s, which fold into a [`Section`] tree owned by a
//! [`Document`]. Everything here is plain data and serializable.

mod document;
mod line;
mod numbering;
mod section;

pub use document::{Document, Metadata, ProcessingStats};
pub use line::{
    rebase_spans, CaptionKind, ChapterLabel, ClassifiedLine, EmphasisSpan, EmphasisStyle,
    LineClass, LineType,
};
pub use numbering::{
    alpha_value, chapter_number, from_roman, to_roman, NumberingKind, NumberingToken,
};
pub use section::{
    ContentBlock, ListBlock, ListItem, ListKind, OutlineEntry, Paragraph, ParagraphRole, Section,
    SectionKind, TableBlock,
};
