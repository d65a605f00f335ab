//! Document model types.
//!
//! These records sit between the page decoder and the JSON output. Spans
//! come in from a [`crate::parser::PageSource`], structure and ranking
//! records go out through [`crate::render`].

mod language;
mod section;
mod span;
mod structure;

pub use language::{Language, LocalizedText};
pub use section::{
    ExtractedSection, RankedSection, RankingReport, ReportMetadata, Section, SubSectionAnalysis,
};
pub use span::{is_bold_font, BoundingBox, Span};
pub use structure::{
    DocumentMetadata, DocumentStructure, ExtractedTable, HeadingEntry, HeadingLevel, TableHeaders,
};
