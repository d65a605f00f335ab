//! Language identification and script-aware normalization.
//!
//! Every surfaced text (title, heading, table header) goes through
//! [`LanguageNormalizer`], which maps detector output onto the closed
//! [`Language`] set and applies the matching whitespace normalization.

pub mod identify;
pub mod indic;
pub mod integrity;
pub mod segment;

use std::sync::Arc;

pub use identify::{LanguageIdentifier, ScriptIdentifier};
pub use indic::{IndicTokenizer, PunctuationSpacer, UnicodeIndicTokenizer};
pub use integrity::{
    is_authentic_devanagari, DirectoryValidation, FieldIssue, IntegrityChecker, IntegrityIssue,
    IntegrityReport, ValidationSummary,
};
pub use segment::{DictionarySegmenter, WordSegmenter};

use crate::model::{Language, LocalizedText};

/// Single entry point for language-dependent text normalization.
///
/// Normalization only ever changes whitespace.
#[derive(Clone)]
pub struct LanguageNormalizer {
    identifier: Arc<dyn LanguageIdentifier>,
    segmenter: Arc<dyn WordSegmenter>,
    tokenizer: Option<Arc<dyn IndicTokenizer>>,
    spacer: Arc<PunctuationSpacer>,
}

impl Default for LanguageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageNormalizer {
    /// Create a normalizer with the built-in collaborators.
    pub fn new() -> Self {
        Self {
            identifier: Arc::new(ScriptIdentifier::new()),
            segmenter: Arc::new(DictionarySegmenter::new()),
            tokenizer: Some(Arc::new(UnicodeIndicTokenizer::new())),
            spacer: Arc::new(PunctuationSpacer::new()),
        }
    }

    /// Replace the language identifier.
    pub fn with_identifier(mut self, identifier: Arc<dyn LanguageIdentifier>) -> Self {
        self.identifier = identifier;
        self
    }

    /// Replace the word segmenter.
    pub fn with_segmenter(mut self, segmenter: Arc<dyn WordSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Replace the Devanagari tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn IndicTokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Run without a Devanagari tokenizer (punctuation spacing only).
    pub fn without_tokenizer(mut self) -> Self {
        self.tokenizer = None;
        self
    }

    /// Identify the language of `text`; anything unsupported is English.
    pub fn identify(&self, text: &str) -> Language {
        Language::from_label(self.identifier.identify(text).as_deref())
    }

    /// Normalize `text` as `language`.
    pub fn normalize_as(&self, text: &str, language: Language) -> String {
        match language {
            Language::En => {
                if text.is_empty() || text.contains(' ') {
                    text.trim().to_string()
                } else {
                    self.segmenter.segment(text).trim().to_string()
                }
            }
            Language::Hi | Language::Mr => match &self.tokenizer {
                Some(tokenizer) => tokenizer.tokenize(text, language),
                None => self.spacer.apply(text),
            },
        }
    }

    /// Identify and normalize `text`.
    pub fn normalize(&self, text: &str) -> (Language, String) {
        let language = self.identify(text);
        (language, self.normalize_as(text, language))
    }

    /// Identify and normalize `text` into a single-entry map.
    pub fn localize(&self, text: &str) -> LocalizedText {
        let (language, normalized) = self.normalize(text);
        LocalizedText::single(language, normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLabel(&'static str);

    impl LanguageIdentifier for FixedLabel {
        fn identify(&self, _text: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_english_with_space_is_trimmed_only() {
        let normalizer = LanguageNormalizer::new();
        assert_eq!(
            normalizer.normalize("  Literature Reviewof Methods "),
            (Language::En, "Literature Reviewof Methods".to_string())
        );
    }

    #[test]
    fn test_english_single_token_is_segmented() {
        let normalizer = LanguageNormalizer::new();
        assert_eq!(
            normalizer.normalize_as("Applicationform", Language::En),
            "Application form"
        );
    }

    #[test]
    fn test_devanagari_tokenized() {
        let normalizer = LanguageNormalizer::new();
        let (language, text) = normalizer.normalize("भारत  का इतिहास।");
        assert_eq!(language, Language::Hi);
        assert_eq!(text, "भारत का इतिहास।");
    }

    #[test]
    fn test_fallback_without_tokenizer() {
        let normalizer = LanguageNormalizer::new().without_tokenizer();
        assert_eq!(
            normalizer.normalize_as("पहला।दूसरा", Language::Mr),
            "पहला। दूसरा"
        );
    }

    #[test]
    fn test_unsupported_label_maps_to_english() {
        let normalizer = LanguageNormalizer::new().with_identifier(Arc::new(FixedLabel("fr")));
        let text = normalizer.localize("Bonjour tout le monde");
        assert_eq!(text.get(Language::En), Some("Bonjour tout le monde"));
        assert_eq!(text.len(), 1);
    }

    #[test]
    fn test_failed_detection_maps_to_english() {
        let normalizer = LanguageNormalizer::new();
        assert_eq!(normalizer.identify("2024"), Language::En);
    }
}
