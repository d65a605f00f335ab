//! Span collection from a page source.

use regex::Regex;

use super::source::PageSource;
use crate::model::{is_bold_font, Span};

/// Spans of one page in visual order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpans {
    /// 1-based page number
    pub number: u32,
    /// Kept spans, `position_index` counting from 0
    pub spans: Vec<Span>,
}

/// Every span of a document, grouped by page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedDocument {
    /// Pages that decoded successfully, in page order
    pub pages: Vec<PageSpans>,
    /// Page count of the document, including pages that failed to decode
    pub total_pages: u32,
}

impl CollectedDocument {
    /// Iterate all spans in document order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.pages.iter().flat_map(|p| p.spans.iter())
    }

    /// Spans of one page, if it decoded.
    pub fn page(&self, number: u32) -> Option<&PageSpans> {
        self.pages.iter().find(|p| p.number == number)
    }
}

/// Turns decoded pages into validated [`Span`] records.
pub struct SpanCollector {
    whitespace: Regex,
}

impl Default for SpanCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanCollector {
    /// Create a collector.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("static whitespace pattern"),
        }
    }

    /// Collapse whitespace runs to single spaces and trim.
    pub fn sanitize(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }

    /// Collect spans of every page.
    ///
    /// Pages that fail to decode are logged and left out.
    pub fn collect(&self, source: &dyn PageSource) -> CollectedDocument {
        let total_pages = source.page_count();
        let mut pages = Vec::with_capacity(total_pages as usize);

        for number in 1..=total_pages {
            match source.page(number) {
                Ok(page) => {
                    let mut spans = Vec::new();
                    for run in page.runs() {
                        let text = self.sanitize(&run.text);
                        if text.is_empty() {
                            continue;
                        }
                        match Span::new(
                            text,
                            run.font_size,
                            is_bold_font(&run.font_name),
                            number,
                            spans.len(),
                            run.bbox,
                        ) {
                            Ok(span) => spans.push(span),
                            Err(e) => log::debug!("Dropping run on page {}: {}", number, e),
                        }
                    }
                    pages.push(PageSpans { number, spans });
                }
                Err(e) => log::warn!("Skipping page {}: {}", number, e),
            }
        }

        CollectedDocument { pages, total_pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source::{InMemorySource, StyledRun};

    #[test]
    fn test_sanitize() {
        let collector = SpanCollector::new();
        assert_eq!(collector.sanitize("  Data \t sets\n"), "Data sets");
        assert_eq!(collector.sanitize(" \n "), "");
    }

    #[test]
    fn test_collect_drops_blank_runs_and_indexes() {
        let source = InMemorySource::new().with_page(vec![
            StyledRun::new("   ", 10.0, "Arial"),
            StyledRun::new("Title", 20.0, "Arial-Bold"),
            StyledRun::new("Body\ntext", 10.0, "Arial"),
        ]);
        let doc = SpanCollector::new().collect(&source);

        assert_eq!(doc.total_pages, 1);
        let spans = &doc.pages[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text(), "Title");
        assert!(spans[0].is_bold());
        assert_eq!(spans[0].position_index(), 0);
        assert_eq!(spans[1].text(), "Body text");
        assert_eq!(spans[1].position_index(), 1);
    }

    #[test]
    fn test_failing_page_is_skipped() {
        let source = InMemorySource::new()
            .with_page(vec![StyledRun::new("One", 10.0, "Arial")])
            .with_failing_page()
            .with_page(vec![StyledRun::new("Three", 10.0, "Arial")]);
        let doc = SpanCollector::new().collect(&source);

        assert_eq!(doc.total_pages, 3);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].number, 3);
        assert!(doc.page(2).is_none());
        assert_eq!(doc.spans().count(), 2);
    }
}
