//! Page decoding and span collection.

mod backend;
mod collector;
mod options;
mod source;
mod table_detector;

pub use backend::{decode_text_simple, has_pdf_header, LopdfSource};
pub use collector::{CollectedDocument, PageSpans, SpanCollector};
pub use options::{ExtractOptions, TableScope, TitleConflictPolicy};
pub use source::{DecodedBlock, DecodedLine, DecodedPage, InMemorySource, PageSource, StyledRun};
pub use table_detector::{
    is_bullet_marker, is_number_marker, Grid, StreamTableDetector, TableDetectorConfig,
    TableGridExtractor,
};
