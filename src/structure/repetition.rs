//! Running header, footer and watermark detection.

use std::collections::{HashMap, HashSet};

use crate::parser::{CollectedDocument, ExtractOptions};

/// Strings judged to be boilerplate for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionSet {
    strings: HashSet<String>,
}

impl RepetitionSet {
    /// Minimum number of pages a string must appear on to be boilerplate.
    pub fn threshold(total_pages: u32, options: &ExtractOptions) -> usize {
        // The epsilon absorbs float error in N * ratio (5 * 0.6 must stay 3)
        let by_ratio = (total_pages as f64 * options.repetition_ratio - 1e-9).ceil();
        (by_ratio.max(0.0) as usize).max(options.repetition_min_pages)
    }

    /// Find strings that recur on enough pages.
    ///
    /// A string is counted at most once per page.
    pub fn detect(doc: &CollectedDocument, options: &ExtractOptions) -> Self {
        let mut page_counts: HashMap<&str, usize> = HashMap::new();
        for page in &doc.pages {
            let unique: HashSet<&str> = page.spans.iter().map(|s| s.text()).collect();
            for text in unique {
                *page_counts.entry(text).or_insert(0) += 1;
            }
        }

        let threshold = Self::threshold(doc.total_pages, options);
        let strings: HashSet<String> = page_counts
            .into_iter()
            .filter(|(text, count)| {
                let len = text.chars().count();
                *count >= threshold && len > 0 && len < options.repetition_max_len
            })
            .map(|(text, _)| text.to_string())
            .collect();

        if !strings.is_empty() {
            log::debug!(
                "{} repeated strings on >= {} of {} pages",
                strings.len(),
                threshold,
                doc.total_pages
            );
        }
        Self { strings }
    }

    /// Whether `text` (trimmed) is boilerplate.
    pub fn contains(&self, text: &str) -> bool {
        self.strings.contains(text.trim())
    }

    /// Number of boilerplate strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether no boilerplate was found.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Span};
    use crate::parser::PageSpans;

    fn doc(pages: &[&[&str]]) -> CollectedDocument {
        CollectedDocument {
            pages: pages
                .iter()
                .enumerate()
                .map(|(p, texts)| PageSpans {
                    number: p as u32 + 1,
                    spans: texts
                        .iter()
                        .enumerate()
                        .map(|(i, t)| {
                            Span::new(*t, 10.0, false, p as u32 + 1, i, BoundingBox::default())
                                .unwrap()
                        })
                        .collect(),
                })
                .collect(),
            total_pages: pages.len() as u32,
        }
    }

    #[test]
    fn test_threshold() {
        let options = ExtractOptions::default();
        assert_eq!(RepetitionSet::threshold(10, &options), 6);
        assert_eq!(RepetitionSet::threshold(5, &options), 3);
        assert_eq!(RepetitionSet::threshold(4, &options), 3);
        assert_eq!(RepetitionSet::threshold(1, &options), 2);
        assert_eq!(RepetitionSet::threshold(2, &options), 2);
        assert_eq!(RepetitionSet::threshold(15, &options), 9);
        assert_eq!(RepetitionSet::threshold(20, &options), 12);
    }

    #[test]
    fn test_detects_running_footer() {
        let doc = doc(&[
            &["Intro", "Confidential Draft"],
            &["Body", "Confidential Draft"],
            &["More", "Confidential Draft"],
        ]);
        let set = RepetitionSet::detect(&doc, &ExtractOptions::default());
        assert!(set.contains("Confidential Draft"));
        assert!(set.contains("  Confidential Draft "));
        assert!(!set.contains("Intro"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_counted_once_per_page() {
        let doc = doc(&[&["Note", "Note", "Note"], &["Other"], &["Else"]]);
        let set = RepetitionSet::detect(&doc, &ExtractOptions::default());
        assert!(!set.contains("Note"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_long_strings_never_repetitive() {
        let long = "x".repeat(80);
        let doc = doc(&[&[long.as_str()], &[long.as_str()]]);
        let set = RepetitionSet::detect(&doc, &ExtractOptions::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_single_page_document_has_no_boilerplate() {
        let doc = doc(&[&["Header", "Header"]]);
        assert!(RepetitionSet::detect(&doc, &ExtractOptions::default()).is_empty());
    }
}
