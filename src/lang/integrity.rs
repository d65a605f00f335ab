//! Devanagari text integrity checks.
//!
//! Broken font encodings tend to leave Latin letters, digits or private-use
//! glyphs glued to Devanagari runs. These checks flag such output so it can
//! be re-extracted or reported.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

/// Characters allowed next to Devanagari in authentic text.
const FOREIGN_IN_DEVANAGARI: &str = r#"[^\x{0900}-\x{097F}\s.,!?;:()\[\]{}"'-]"#;

/// Snippets longer than this are shortened in validation issues.
const SNIPPET_LEN: usize = 100;

/// Check whether a character is in the Devanagari block.
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Check that Devanagari text is free of corruption patterns.
///
/// Empty text and text without any Devanagari always pass. Otherwise the
/// text fails if it contains characters outside the Devanagari block,
/// whitespace and basic punctuation, or Latin/digit runs glued to
/// Devanagari runs.
pub fn is_authentic_devanagari(text: &str) -> bool {
    if !text.chars().any(is_devanagari) {
        return true;
    }

    let mut prev: Option<char> = None;
    for c in text.chars() {
        if !allowed_in_devanagari(c) {
            return false;
        }
        if let Some(p) = prev {
            let latin_then_deva = p.is_ascii_alphanumeric() && is_devanagari(c);
            let deva_then_latin = is_devanagari(p) && c.is_ascii_alphanumeric();
            if latin_then_deva || deva_then_latin {
                return false;
            }
        }
        prev = Some(c);
    }
    true
}

fn allowed_in_devanagari(c: char) -> bool {
    is_devanagari(c)
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ',' | '!' | '?' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\'' | '-'
        )
}

/// One corruption signal found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Devanagari and Latin letters in the same text
    MixedScripts {
        /// Devanagari characters
        devanagari_count: usize,
        /// ASCII letters
        latin_count: usize,
    },
    /// Some character repeated three or more times in a row
    RepeatedCharacters {
        /// The repeated characters
        repeated_chars: Vec<char>,
    },
    /// Matches of one suspicious pattern (first five kept)
    UnusualPatterns {
        /// Matched substrings
        patterns: Vec<String>,
    },
    /// Text differs from its NFC form
    NotNfc,
}

/// Result of [`IntegrityChecker::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Whether any issue was found
    pub is_garbled: bool,
    /// Issues found
    pub issues: Vec<IntegrityIssue>,
    /// Length in characters
    pub text_length: usize,
    /// Number of Devanagari characters
    pub devanagari_chars: usize,
    /// Number of ASCII letters
    pub latin_chars: usize,
}

/// A garbled text found while validating a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// JSON path of the field (e.g. `outline[3].text.hi`)
    pub field: String,
    /// The text, shortened
    pub text: String,
    /// Detailed analysis
    pub garbled_info: IntegrityReport,
}

/// Validation counts for one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Source file, when validated from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Texts inspected
    pub total_texts: usize,
    /// Texts that passed
    pub valid_texts: usize,
    /// Texts that failed
    pub garbled_texts: usize,
    /// Details of every failing text
    pub issues: Vec<FieldIssue>,
    /// `valid_texts / total_texts`, 0 when nothing was inspected
    pub accuracy: f64,
}

/// Aggregate over a directory of JSON outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryValidation {
    /// JSON files inspected
    pub total_files_processed: usize,
    /// Garbled texts across all files
    pub total_issues_found: usize,
    /// Files with at least one garbled text
    pub files_with_issues: usize,
    /// Mean of per-file accuracy
    pub overall_accuracy: f64,
    /// Per-file results
    pub detailed_results: Vec<ValidationSummary>,
}

/// Integrity analysis with precompiled patterns.
pub struct IntegrityChecker {
    unusual: [Regex; 3],
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrityChecker {
    /// Create a checker.
    pub fn new() -> Self {
        let compile = |p: &str| Regex::new(p).expect("static integrity pattern");
        Self {
            unusual: [
                compile(FOREIGN_IN_DEVANAGARI),
                compile(r"[A-Z]{3,}"),
                compile(r"[0-9]+[A-Za-z]+"),
            ],
        }
    }

    /// Analyze a text for corruption signals.
    pub fn analyze(&self, text: &str) -> IntegrityReport {
        let devanagari_chars = text.chars().filter(|c| is_devanagari(*c)).count();
        let latin_chars = text.chars().filter(char::is_ascii_alphabetic).count();
        let mut issues = Vec::new();

        if text.is_empty() {
            return IntegrityReport {
                is_garbled: false,
                issues,
                text_length: 0,
                devanagari_chars,
                latin_chars,
            };
        }

        if devanagari_chars > 0 && latin_chars > 0 {
            issues.push(IntegrityIssue::MixedScripts {
                devanagari_count: devanagari_chars,
                latin_count: latin_chars,
            });
        }

        let repeated = repeated_chars(text);
        if !repeated.is_empty() {
            issues.push(IntegrityIssue::RepeatedCharacters {
                repeated_chars: repeated,
            });
        }

        for pattern in &self.unusual {
            let patterns: Vec<String> = pattern
                .find_iter(text)
                .take(5)
                .map(|m| m.as_str().to_string())
                .collect();
            if !patterns.is_empty() {
                issues.push(IntegrityIssue::UnusualPatterns { patterns });
            }
        }

        if text.nfc().ne(text.chars()) {
            issues.push(IntegrityIssue::NotNfc);
        }

        IntegrityReport {
            is_garbled: !issues.is_empty(),
            issues,
            text_length: text.chars().count(),
            devanagari_chars,
            latin_chars,
        }
    }

    /// Validate the text fields of a structure or ranking JSON document.
    ///
    /// Inspects `title`, every `outline[i].text` and every
    /// `extracted_sections[i].section_title`.
    pub fn validate_json(&self, value: &Value) -> ValidationSummary {
        let mut summary = ValidationSummary::default();

        if let Some(title) = value.get("title") {
            self.visit(title, "title".to_string(), &mut summary);
        }
        if let Some(outline) = value.get("outline").and_then(Value::as_array) {
            for (i, item) in outline.iter().enumerate() {
                if let Some(text) = item.get("text") {
                    self.visit(text, format!("outline[{}].text", i), &mut summary);
                }
            }
        }
        if let Some(sections) = value.get("extracted_sections").and_then(Value::as_array) {
            for (i, item) in sections.iter().enumerate() {
                if let Some(title) = item.get("section_title") {
                    self.visit(
                        title,
                        format!("extracted_sections[{}].section_title", i),
                        &mut summary,
                    );
                }
            }
        }

        if summary.total_texts > 0 {
            summary.accuracy = summary.valid_texts as f64 / summary.total_texts as f64;
        }
        summary
    }

    /// Read and validate one JSON file.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidationSummary> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&data)?;
        let mut summary = self.validate_json(&value);
        summary.file = Some(path.to_path_buf());
        Ok(summary)
    }

    /// Validate every `*.json` file in a directory, in file name order.
    ///
    /// Files that cannot be read or parsed are logged and skipped.
    pub fn validate_directory<P: AsRef<Path>>(&self, dir: P) -> Result<DirectoryValidation> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        let mut report = DirectoryValidation::default();
        for path in paths {
            match self.validate_file(&path) {
                Ok(summary) => report.detailed_results.push(summary),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        report.total_files_processed = report.detailed_results.len();
        report.total_issues_found = report.detailed_results.iter().map(|r| r.issues.len()).sum();
        report.files_with_issues = report
            .detailed_results
            .iter()
            .filter(|r| r.garbled_texts > 0)
            .count();
        if !report.detailed_results.is_empty() {
            report.overall_accuracy = report
                .detailed_results
                .iter()
                .map(|r| r.accuracy)
                .sum::<f64>()
                / report.detailed_results.len() as f64;
        }
        Ok(report)
    }

    fn visit(&self, value: &Value, path: String, summary: &mut ValidationSummary) {
        match value {
            Value::Object(map) => {
                for (key, inner) in map {
                    self.visit(inner, format!("{}.{}", path, key), summary);
                }
            }
            Value::String(text) => {
                summary.total_texts += 1;
                if is_authentic_devanagari(text) {
                    summary.valid_texts += 1;
                } else {
                    summary.garbled_texts += 1;
                    summary.issues.push(FieldIssue {
                        field: path,
                        text: snippet(text),
                        garbled_info: self.analyze(text),
                    });
                }
            }
            _ => {}
        }
    }
}

/// Characters that occur three or more times in a row, sorted.
fn repeated_chars(text: &str) -> Vec<char> {
    let mut found = BTreeSet::new();
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;
    for c in text.chars() {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            run_char = Some(c);
            run_len = 1;
        }
        if run_len == 3 {
            found.insert(c);
        }
    }
    found.into_iter().collect()
}

fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_LEN {
        let head: String = text.chars().take(SNIPPET_LEN).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
