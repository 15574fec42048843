//! Text parsing: cleanup, line classification, numbering and structure.

mod classifier;
mod cleanup;
mod inline;
mod numbering;
mod options;
mod processor;
mod structure;
mod table_detector;

pub use classifier::{
    chapter_label, detect_heading_numbering, detect_numbering, rule_names, ClassifyContext,
    LineClassifier,
};
pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use inline::{extract_emphasis, normalize_dashes, InlineText};
pub use numbering::{
    number_heading, should_synthesize, HeadingNumberingState, HeadingRequest, NumberingOutcome,
    MAX_DEPTH,
};
pub use options::{
    is_reference_heading, normalize_keyword, ListRetention, NumberingPolicy, ParseOptions,
    DEFAULT_STRUCTURAL_KEYWORDS, REFERENCE_KEYWORDS,
};
pub use processor::DocumentProcessor;
pub use structure::{build, short_document, BuildOutput, ShortDocument, StructureBuilder};
pub use table_detector::{ColumnSplit, PipeRow, TableDetector, TableDetectorConfig};
