//! Structure-mode output: title, leveled outline and tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Language, LocalizedText};

/// Outline heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top font-size tier
    H1,
    /// Second font-size tier
    H2,
    /// Everything smaller
    H3,
}

impl HeadingLevel {
    /// Numeric depth (1-3).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: LocalizedText,
    /// 1-based page number
    pub page: u32,
}

impl HeadingEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: LocalizedText, page: u32) -> Self {
        Self { level, text, page }
    }
}

/// Header row of a table; the whole row shares one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, Vec<String>>",
    try_from = "BTreeMap<String, Vec<String>>"
)]
pub struct TableHeaders {
    /// Language detected for the joined header row
    pub language: Language,
    /// Normalized header cells
    pub cells: Vec<String>,
}

impl TableHeaders {
    /// Create a header row.
    pub fn new(language: Language, cells: Vec<String>) -> Self {
        Self { language, cells }
    }
}

impl From<TableHeaders> for BTreeMap<String, Vec<String>> {
    fn from(headers: TableHeaders) -> Self {
        let mut map = BTreeMap::new();
        map.insert(headers.language.code().to_string(), headers.cells);
        map
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TableHeaders {
    type Error = String;

    fn try_from(map: BTreeMap<String, Vec<String>>) -> std::result::Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "table headers must carry exactly one language, found {}",
                map.len()
            ));
        }
        let (code, cells) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty header map".to_string())?;
        let language = Language::from_code(&code)
            .ok_or_else(|| format!("unsupported language code '{}'", code))?;
        Ok(Self { language, cells })
    }
}

/// A table found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTable {
    /// 1-based page number
    pub page: u32,
    /// Header row
    pub headers: TableHeaders,
    /// Body rows; every kept row has at least one non-empty cell
    pub data: Vec<Vec<String>>,
}

/// Title, outline and tables of one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Document title (possibly empty)
    pub title: LocalizedText,
    /// Leveled headings in discovery order
    pub outline: Vec<HeadingEntry>,
    /// Detected tables
    pub tables: Vec<ExtractedTable>,
}

impl DocumentStructure {
    /// The empty result emitted for documents that could not be opened.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty() && self.tables.is_empty()
    }

    /// Count headings per level.
    pub fn level_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for entry in &self.outline {
            counts[(entry.level.depth() - 1) as usize] += 1;
        }
        counts
    }
}

/// Document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// PDF producer
    pub producer: Option<String>,
    /// Total number of pages
    pub page_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_structure_shape() {
        let json = serde_json::to_string(&DocumentStructure::empty()).unwrap();
        assert_eq!(json, r#"{"title":{},"outline":[],"tables":[]}"#);
    }

    #[test]
    fn test_heading_entry_json() {
        let entry = HeadingEntry::new(
            HeadingLevel::H2,
            LocalizedText::single(Language::En, "Methods"),
            3,
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"level":"H2","text":{"en":"Methods"},"page":3}"#);
    }

    #[test]
    fn test_table_json_shape() {
        let table = ExtractedTable {
            page: 2,
            headers: TableHeaders::new(Language::Hi, vec!["नाम".into(), "आयु".into()]),
            data: vec![vec!["राम".into(), "30".into()]],
        };
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["headers"]["hi"][0], "नाम");
        assert_eq!(json["data"][0][1], "30");

        let back: ExtractedTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_table_headers_reject_multiple_languages() {
        let result: std::result::Result<TableHeaders, _> =
            serde_json::from_str(r#"{"en":["A"],"hi":["ब"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_level_counts() {
        let mut structure = DocumentStructure::empty();
        for level in [HeadingLevel::H1, HeadingLevel::H3, HeadingLevel::H3] {
            structure
                .outline
                .push(HeadingEntry::new(level, LocalizedText::new(), 1));
        }
        assert_eq!(structure.level_counts(), [1, 0, 2]);
        assert!(!structure.is_empty());
    }
}
