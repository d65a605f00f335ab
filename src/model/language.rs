//! Supported languages and per-language text maps.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of languages the extractor emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Language {
    /// English (Latin script). Also the fallback for anything unrecognized.
    #[default]
    En,
    /// Hindi (Devanagari)
    Hi,
    /// Marathi (Devanagari)
    Mr,
}

impl Language {
    /// All supported languages in code order.
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    /// Parse a supported code. Anything else yields `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            "mr" => Some(Language::Mr),
            _ => None,
        }
    }

    /// Map a detector label onto the closed set, defaulting to English.
    pub fn from_label(label: Option<&str>) -> Self {
        label.and_then(Self::from_code).unwrap_or_default()
    }

    /// Whether the language is written in Devanagari.
    pub fn is_devanagari(self) -> bool {
        matches!(self, Language::Hi | Language::Mr)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The same logical text in up to three supported languages.
///
/// Serializes as a JSON object keyed by language code. Unknown keys are
/// rejected on deserialization so foreign labels never leak in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, String>", try_from = "BTreeMap<String, String>")]
pub struct LocalizedText {
    entries: BTreeMap<Language, String>,
}

impl LocalizedText {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding a single entry.
    pub fn single(language: Language, text: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(language, text);
        map
    }

    /// Insert (or overwrite) the entry for `language`.
    pub fn insert(&mut self, language: Language, text: impl Into<String>) {
        self.entries.insert(language, text.into());
    }

    /// Insert only if `language` has no entry yet. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, language: Language, text: impl Into<String>) -> bool {
        if self.entries.contains_key(&language) {
            return false;
        }
        self.entries.insert(language, text.into());
        true
    }

    /// Get the entry for `language`.
    pub fn get(&self, language: Language) -> Option<&str> {
        self.entries.get(&language).map(String::as_str)
    }

    /// Whether an entry exists for `language`.
    pub fn contains(&self, language: Language) -> bool {
        self.entries.contains_key(&language)
    }

    /// Iterate entries in language-code order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.entries.iter().map(|(lang, text)| (*lang, text.as_str()))
    }

    /// Languages present.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every entry is blank.
    pub fn is_blank(&self) -> bool {
        self.entries.values().all(|text| text.trim().is_empty())
    }

    /// All entries joined with single spaces.
    pub fn joined(&self) -> String {
        self.entries
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<LocalizedText> for BTreeMap<String, String> {
    fn from(text: LocalizedText) -> Self {
        text.entries
            .into_iter()
            .map(|(lang, value)| (lang.code().to_string(), value))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, String>> for LocalizedText {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> std::result::Result<Self, Self::Error> {
        let mut text = LocalizedText::new();
        for (code, value) in map {
            let lang = Language::from_code(&code)
                .ok_or_else(|| format!("unsupported language code '{}'", code))?;
            text.insert(lang, value);
        }
        Ok(text)
    }
}

impl FromIterator<(Language, String)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (Language, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
