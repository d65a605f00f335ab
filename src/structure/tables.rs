//! Table qualification and header normalization.

use crate::lang::LanguageNormalizer;
use crate::model::{ExtractedTable, TableHeaders};
use crate::parser::{CollectedDocument, ExtractOptions, Grid, SpanCollector, TableGridExtractor};

/// Turn grids found on every in-scope page into tables.
///
/// A grid qualifies with at least one data row and two non-empty header
/// cells. Extraction failures are logged and cost only that page.
pub fn build_tables(
    doc: &CollectedDocument,
    extractor: &dyn TableGridExtractor,
    normalizer: &LanguageNormalizer,
    collector: &SpanCollector,
    options: &ExtractOptions,
) -> Vec<ExtractedTable> {
    let mut tables = Vec::new();
    for page in doc.pages.iter().filter(|p| options.table_scope.includes(p.number)) {
        let grids = match extractor.extract_grids(page) {
            Ok(grids) => grids,
            Err(e) => {
                log::warn!("Table extraction failed on page {}: {}", page.number, e);
                continue;
            }
        };
        tables.extend(
            grids
                .iter()
                .filter_map(|grid| qualify(grid, page.number, normalizer, collector)),
        );
    }
    tables
}

fn qualify(
    grid: &Grid,
    page: u32,
    normalizer: &LanguageNormalizer,
    collector: &SpanCollector,
) -> Option<ExtractedTable> {
    let (header_row, body) = grid.split_first()?;
    if body.is_empty() {
        return None;
    }

    let header: Vec<String> = header_row
        .iter()
        .map(|cell| collector.sanitize(cell))
        .filter(|cell| !cell.is_empty())
        .collect();
    if header.len() < 2 {
        return None;
    }

    let language = normalizer.identify(&header.join(" "));
    let cells = header
        .iter()
        .map(|cell| normalizer.normalize_as(cell, language))
        .collect();

    let data = body
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| collector.sanitize(cell))
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Some(ExtractedTable {
        page,
        headers: TableHeaders::new(language, cells),
        data,
    })
}
