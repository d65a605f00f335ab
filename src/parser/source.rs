//! Page source abstraction.
//!
//! A [`PageSource`] yields decoded pages as blocks of lines of styled
//! runs, the plain text of each page and the document information
//! dictionary. The structure engine only ever talks to this trait.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, DocumentMetadata};

/// A run of identically styled text as delivered by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    /// Raw text (whitespace not yet collapsed)
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Base font name (e.g. "Helvetica-Bold")
    pub font_name: String,
    /// Approximate geometry
    pub bbox: BoundingBox,
}

impl StyledRun {
    /// Create a run with an empty bounding box.
    pub fn new(text: impl Into<String>, font_size: f32, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: font_name.into(),
            bbox: BoundingBox::default(),
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }
}

/// One visual line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLine {
    /// Runs left to right
    pub runs: Vec<StyledRun>,
}

impl DecodedLine {
    /// Runs joined with single spaces.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A group of vertically adjacent lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBlock {
    /// Lines top to bottom
    pub lines: Vec<DecodedLine>,
}

/// A decoded page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPage {
    /// 1-based page number
    pub number: u32,
    /// Blocks top to bottom
    pub blocks: Vec<DecodedBlock>,
}

impl DecodedPage {
    /// Iterate every run in visual order.
    pub fn runs(&self) -> impl Iterator<Item = &StyledRun> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.runs.iter())
    }

    /// Reconstructed text: one line per visual line.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(DecodedLine::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Access to a paginated document.
pub trait PageSource {
    /// Total number of pages, including pages that fail to decode.
    fn page_count(&self) -> u32;

    /// Decode one page (1-based).
    fn page(&self, number: u32) -> Result<DecodedPage>;

    /// Plain text of one page (1-based).
    fn page_text(&self, number: u32) -> Result<String>;

    /// Document information dictionary.
    fn metadata(&self) -> DocumentMetadata;
}

/// A page source held entirely in memory.
///
/// Each pushed run becomes its own line; pages can be marked as failing
/// to exercise partial-result handling.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pages: Vec<Option<DecodedPage>>,
    texts: BTreeMap<u32, String>,
    metadata: DocumentMetadata,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page made of the given runs.
    pub fn with_page(mut self, runs: Vec<StyledRun>) -> Self {
        let number = self.pages.len() as u32 + 1;
        let lines = runs
            .into_iter()
            .map(|run| DecodedLine { runs: vec![run] })
            .collect();
        self.pages.push(Some(DecodedPage {
            number,
            blocks: vec![DecodedBlock { lines }],
        }));
        self
    }

    /// Append a fully structured page.
    pub fn with_decoded_page(mut self, mut page: DecodedPage) -> Self {
        page.number = self.pages.len() as u32 + 1;
        self.pages.push(Some(page));
        self
    }

    /// Append a page whose decoding always fails.
    pub fn with_failing_page(mut self) -> Self {
        self.pages.push(None);
        self
    }

    /// Override the plain text returned for `page`.
    pub fn with_page_text(mut self, page: u32, text: impl Into<String>) -> Self {
        self.texts.insert(page, text.into());
        self
    }

    /// Set the document information dictionary.
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn slot(&self, number: u32) -> Result<&DecodedPage> {
        let count = self.page_count();
        if number == 0 || number > count {
            return Err(Error::PageOutOfRange(number, count));
        }
        self.pages[(number - 1) as usize]
            .as_ref()
            .ok_or_else(|| Error::TextExtract(format!("page {} could not be decoded", number)))
    }
}

impl PageSource for InMemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<DecodedPage> {
        self.slot(number).cloned()
    }

    fn page_text(&self, number: u32) -> Result<String> {
        let page = self.slot(number)?;
        Ok(self
            .texts
            .get(&number)
            .cloned()
            .unwrap_or_else(|| page.text()))
    }

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            page_count: self.page_count(),
            ..self.metadata.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_pages() {
        let source = InMemorySource::new()
            .with_page(vec![
                StyledRun::new("Title", 20.0, "Arial-Bold"),
                StyledRun::new("Body text", 10.0, "Arial"),
            ])
            .with_failing_page();

        assert_eq!(source.page_count(), 2);
        let page = source.page(1).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.runs().count(), 2);
        assert_eq!(source.page_text(1).unwrap(), "Title\nBody text");

        assert!(source.page(2).is_err());
        assert!(matches!(
            source.page(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }

    #[test]
    fn test_page_text_override() {
        let source = InMemorySource::new()
            .with_page(vec![StyledRun::new("Heading", 14.0, "Arial")])
            .with_page_text(1, "Heading and then the whole page");
        assert_eq!(
            source.page_text(1).unwrap(),
            "Heading and then the whole page"
        );
    }

    #[test]
    fn test_metadata_page_count() {
        let source = InMemorySource::new()
            .with_page(vec![])
            .with_page(vec![])
            .with_metadata(DocumentMetadata {
                title: Some("Annual Report".into()),
                ..Default::default()
            });
        let metadata = source.metadata();
        assert_eq!(metadata.page_count, 2);
        assert_eq!(metadata.title.as_deref(), Some("Annual Report"));
    }

    #[test]
    fn test_line_text_skips_blank_runs() {
        let line = DecodedLine {
            runs: vec![
                StyledRun::new(" Data ", 10.0, "Arial"),
                StyledRun::new("  ", 10.0, "Arial"),
                StyledRun::new("sets", 10.0, "Arial"),
            ],
        };
        assert_eq!(line.text(), "Data sets");
    }
}
