//! Devanagari tokenization.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::model::Language;

/// Script-aware tokenizer for Hindi and Marathi text.
pub trait IndicTokenizer: Send + Sync {
    /// Return `text` with tokens separated by single spaces.
    ///
    /// Implementations must only change whitespace.
    fn tokenize(&self, text: &str, language: Language) -> String;
}

/// Tokenizer built on Unicode word boundaries (UAX #29).
///
/// Punctuation becomes its own token; the danda stays glued to the
/// preceding word.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeIndicTokenizer;

impl UnicodeIndicTokenizer {
    /// Create a tokenizer.
    pub fn new() -> Self {
        Self
    }
}

impl IndicTokenizer for UnicodeIndicTokenizer {
    fn tokenize(&self, text: &str, _language: Language) -> String {
        text.split_word_bounds()
            .filter(|token| !token.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace(" ।", "।")
            .trim()
            .to_string()
    }
}

/// Punctuation spacing used when no tokenizer is configured.
pub struct PunctuationSpacer {
    punctuation: Regex,
}

impl Default for PunctuationSpacer {
    fn default() -> Self {
        Self::new()
    }
}

impl PunctuationSpacer {
    /// Create a spacer.
    pub fn new() -> Self {
        Self {
            punctuation: Regex::new(r"([।,.!?])").expect("static punctuation pattern"),
        }
    }

    /// Put a space after every danda and sentence punctuation mark.
    pub fn apply(&self, text: &str) -> String {
        self.punctuation
            .replace_all(text, "$1 ")
            .replace("  ", " ")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danda_stays_attached() {
        let tokenizer = UnicodeIndicTokenizer::new();
        assert_eq!(
            tokenizer.tokenize("भारत का   इतिहास।", Language::Hi),
            "भारत का इतिहास।"
        );
    }

    #[test]
    fn test_comma_separated() {
        let tokenizer = UnicodeIndicTokenizer::new();
        assert_eq!(
            tokenizer.tokenize("नमस्ते,दुनिया", Language::Mr),
            "नमस्ते , दुनिया"
        );
    }

    #[test]
    fn test_combining_marks_not_split() {
        let tokenizer = UnicodeIndicTokenizer::new();
        assert_eq!(tokenizer.tokenize("प्रस्तावना", Language::Mr), "प्रस्तावना");
    }

    #[test]
    fn test_punctuation_spacer() {
        let spacer = PunctuationSpacer::new();
        assert_eq!(spacer.apply("पहला।दूसरा"), "पहला। दूसरा");
        assert_eq!(spacer.apply("एक, दो"), "एक, दो");
        assert_eq!(spacer.apply("अंत।"), "अंत।");
    }
}
