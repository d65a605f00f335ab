//! Word segmentation for run-together English text.
//!
//! Some font encodings drop the inter-word spacing, so "Applicationform"
//! comes out of the decoder as one token. The segmenter puts the spaces
//! back with a unigram cost model.

use std::collections::HashMap;

/// Split a run-together token into space-separated words.
pub trait WordSegmenter: Send + Sync {
    /// Return `token` with spaces inserted between words.
    ///
    /// Implementations must only insert whitespace.
    fn segment(&self, token: &str) -> String;
}

/// Embedded English word list, most frequent first.
const WORDS: &str = include_str!("words.txt");

/// Fixed cost of an out-of-vocabulary chunk.
const UNKNOWN_BASE_COST: f64 = 20.0;

/// Additional cost per character of an out-of-vocabulary chunk.
const UNKNOWN_CHAR_COST: f64 = 2.0;

/// Zipf-cost dynamic-programming segmenter.
///
/// Word costs follow Zipf's law over the rank in the word list. Only runs
/// of ASCII letters are segmented; digits, punctuation and other scripts
/// stay where they are.
pub struct DictionarySegmenter {
    costs: HashMap<String, f64>,
    max_word_len: usize,
}

impl Default for DictionarySegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionarySegmenter {
    /// Build a segmenter over the embedded word list.
    pub fn new() -> Self {
        Self::from_words(WORDS.lines())
    }

    /// Build a segmenter over a custom word list, most frequent first.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_ascii_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let log_n = (words.len().max(2) as f64).ln();

        let mut costs = HashMap::with_capacity(words.len());
        let mut max_word_len = 1;
        for (rank, word) in words.into_iter().enumerate() {
            max_word_len = max_word_len.max(word.len());
            costs
                .entry(word)
                .or_insert_with(|| ((rank + 1) as f64 * log_n).ln());
        }

        Self {
            costs,
            max_word_len,
        }
    }

    /// Whether the word list contains `word` (case-insensitive).
    pub fn contains(&self, word: &str) -> bool {
        self.costs.contains_key(&word.to_ascii_lowercase())
    }

    fn chunk_cost(&self, lower: &str) -> f64 {
        self.costs
            .get(lower)
            .copied()
            .unwrap_or(UNKNOWN_BASE_COST + UNKNOWN_CHAR_COST * lower.len() as f64)
    }

    /// Best split of an ASCII-letter run into words.
    fn split_run<'a>(&self, run: &'a str) -> Vec<&'a str> {
        let lower = run.to_ascii_lowercase();
        if self.costs.contains_key(&lower) {
            return vec![run];
        }

        let n = run.len();
        // best[i] = (cost of best split of run[..i], start of its last word)
        let mut best: Vec<(f64, usize)> = vec![(0.0, 0); n + 1];
        for i in 1..=n {
            // unknown chunks may be longer than any dictionary word
            let mut choice = (best[0].0 + self.chunk_cost(&lower[..i]), 0);
            for k in 1..=i.min(self.max_word_len) {
                let start = i - k;
                let cost = best[start].0 + self.chunk_cost(&lower[start..i]);
                if cost < choice.0 {
                    choice = (cost, start);
                }
            }
            best[i] = choice;
        }

        let mut words = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = best[end].1;
            words.push(&run[start..end]);
            end = start;
        }
        words.reverse();
        words
    }
}

impl WordSegmenter for DictionarySegmenter {
    fn segment(&self, token: &str) -> String {
        let mut out = String::with_capacity(token.len() + 8);
        let mut rest = token;
        while let Some(start) = rest.find(|c: char| c.is_ascii_alphabetic()) {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let len = tail
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(tail.len());
            out.push_str(&self.split_run(&tail[..len]).join(" "));
            rest = &tail[len..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_word_unchanged() {
        let segmenter = DictionarySegmenter::new();
        assert_eq!(segmenter.segment("INTRODUCTION"), "INTRODUCTION");
        assert_eq!(segmenter.segment("Methodology"), "Methodology");
    }

    #[test]
    fn test_splits_run_together_words() {
        let segmenter = DictionarySegmenter::new();
        assert_eq!(segmenter.segment("Applicationform"), "Application form");
        assert_eq!(segmenter.segment("TableofContents"), "Table of Contents");
        assert_eq!(segmenter.segment("literaturereview"), "literature review");
    }

    #[test]
    fn test_only_whitespace_changes() {
        let segmenter = DictionarySegmenter::new();
        for token in ["Revisionhistory:", "Phase2results", "Kathmandu", "café-menu"] {
            let segmented = segmenter.segment(token);
            let stripped: String = segmented.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(stripped, token);
        }
    }

    #[test]
    fn test_unknown_word_kept_whole() {
        let segmenter = DictionarySegmenter::new();
        assert_eq!(segmenter.segment("Xqzvbn"), "Xqzvbn");
    }

    #[test]
    fn test_custom_word_list() {
        let segmenter = DictionarySegmenter::from_words(["red", "fox", "quick"]);
        assert!(segmenter.contains("FOX"));
        assert_eq!(segmenter.segment("quickredfox"), "quick red fox");
    }
}
