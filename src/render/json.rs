//! JSON rendering for structure and ranking output.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{DocumentStructure, RankingReport};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert any output record to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a document structure to JSON.
pub fn structure_to_json(structure: &DocumentStructure, format: JsonFormat) -> Result<String> {
    to_json(structure, format)
}

/// Convert a ranking report to JSON.
pub fn report_to_json(report: &RankingReport, format: JsonFormat) -> Result<String> {
    to_json(report, format)
}
