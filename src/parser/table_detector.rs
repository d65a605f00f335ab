//! Table detection from text alignment (stream mode).
//!
//! Rows come from baseline clustering and columns from left edges that
//! line up across rows. No ruling lines are needed.

use std::collections::{HashMap, HashSet};

use super::collector::PageSpans;
use crate::error::Result;
use crate::model::Span;

/// A table as a row-major grid of cell strings. The first row is the header.
pub type Grid = Vec<Vec<String>>;

/// Finds table grids on a page.
pub trait TableGridExtractor: Send + Sync {
    /// Return every grid found on the page.
    fn extract_grids(&self, page: &PageSpans) -> Result<Vec<Grid>>;
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows in a table region
    pub min_rows: usize,
    /// Minimum number of columns
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Row grouping tolerance as a fraction of the font size
    pub y_tolerance_factor: f32,
    /// Share of row spans that must sit on a column edge
    pub min_alignment_ratio: f32,
    /// Minimum gap between column edges (points)
    pub min_column_gap: f32,
    /// Left-edge bucket width (points)
    pub bucket_size: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            bucket_size: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Row<'a> {
    y: f32,
    spans: Vec<&'a Span>,
}

/// Stream-mode [`TableGridExtractor`].
#[derive(Debug, Clone, Default)]
pub struct StreamTableDetector {
    config: TableDetectorConfig,
}

impl StreamTableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect table grids among spans.
    pub fn detect(&self, spans: &[Span]) -> Vec<Grid> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            log::debug!("TableDetector: {} column edges, no table", columns.len());
            return vec![];
        }

        let mut grids = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping region, looks like a list");
                continue;
            }

            grids.push(to_grid(region, &region_columns));
        }
        grids
    }

    /// Group spans into rows by baseline, top to bottom.
    fn group_into_rows<'a>(&self, spans: &'a [Span]) -> Vec<Row<'a>> {
        let mut sorted: Vec<&Span> = spans.iter().collect();
        sorted.sort_by(|a, b| {
            b.bbox()
                .y0
                .total_cmp(&a.bbox().y0)
                .then(a.bbox().x0.total_cmp(&b.bbox().x0))
        });

        let mut rows: Vec<Row<'a>> = Vec::new();
        for span in sorted {
            let y = span.bbox().y0;
            let tolerance = span.font_size() * self.config.y_tolerance_factor;
            match rows.last_mut() {
                Some(row) if (row.spans[0].bbox().y0 - y).abs() <= tolerance => {
                    row.spans.push(span);
                }
                _ => rows.push(Row {
                    y,
                    spans: vec![span],
                }),
            }
        }
        for row in &mut rows {
            row.y = row.spans.iter().map(|s| s.bbox().y0).sum::<f32>() / row.spans.len() as f32;
        }
        rows
    }

    /// Left edges shared by enough rows, merged when closer than the gap.
    fn detect_columns(&self, rows: &[Row<'_>]) -> Vec<f32> {
        let multi: Vec<&Row<'_>> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        // Few multi-span rows: count every span edge instead of one per row
        let per_row = multi.len() >= self.config.min_rows;
        let considered: Vec<&Row<'_>> = if per_row {
            multi
        } else {
            rows.iter().collect()
        };

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &considered {
            let buckets = row
                .spans
                .iter()
                .map(|s| (s.bbox().x0 / self.config.bucket_size).round() as i32);
            if per_row {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_occurrences =
            ((considered.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);
        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * self.config.bucket_size)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous runs of rows aligned with the column edges.
    fn find_regions(&self, rows: &[Row<'_>], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }
        regions
    }
}

impl TableGridExtractor for StreamTableDetector {
    fn extract_grids(&self, page: &PageSpans) -> Result<Vec<Grid>> {
        Ok(self.detect(&page.spans))
    }
}

fn alignment_score(row: &Row<'_>, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.bbox().x0 - c).abs() <= 5.0))
        .count();
    aligned as f32 / row.spans.len() as f32
}

fn to_grid(rows: &[Row<'_>], columns: &[f32]) -> Grid {
    let right_x = rows
        .iter()
        .flat_map(|r| r.spans.iter())
        .map(|s| s.bbox().x1)
        .fold(f32::MIN, f32::max);

    rows.iter()
        .map(|row| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            let mut spans = row.spans.clone();
            spans.sort_by(|a, b| a.bbox().x0.total_cmp(&b.bbox().x0));
            for span in spans {
                let col = column_for(span.bbox().x0, columns, right_x);
                cells[col].push(span.text());
            }
            cells.into_iter().map(|parts| parts.join(" ")).collect()
        })
        .collect()
}

/// Column whose range holds `x`, or the nearest column edge.
fn column_for(x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if x >= start - 10.0 && x < end - 10.0 {
            return i;
        }
    }
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (x - **a).abs().total_cmp(&(x - **b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Numbered or bulleted lists split into marker and text spans look like
/// two-column tables.
fn is_list_pattern(rows: &[Row<'_>], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let first = row
            .spans
            .iter()
            .min_by(|a, b| a.bbox().x0.total_cmp(&b.bbox().x0));
        if let Some(span) = first {
            if is_bullet_marker(span.text()) {
                bullets += 1;
            } else if is_number_marker(span.text()) {
                numbers += 1;
            }
        }
    }

    let total = rows.len() as f32;
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

/// Check if text is a bullet glyph.
pub fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "‣" | "⁃" | "∙"
    )
}

/// Check if text is a number-style list marker ("1.", "2)", "a.", "3").
pub fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    } else {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
    )
}
