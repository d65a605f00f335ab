//! Relevance scoring against a persona profile.

use std::collections::{BTreeSet, HashMap};

use crate::config::{PersonaProfile, ScorerKind};

/// Scores a section's joined text for relevance.
pub trait RelevanceScorer: Send + Sync {
    /// Higher is more relevant. Must be finite.
    fn score(&self, text: &str) -> f64;
}

/// Words too common to be useful as keywords.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "into", "is", "it",
    "its", "of", "on", "or", "that", "the", "their", "this", "to", "with", "who", "what",
    "using", "based", "focusing",
];

/// Minimum length of a keyword taken from a description.
const MIN_KEYWORD_LEN: usize = 3;

/// Lowercase keywords derived from a free-text description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: BTreeSet<String>,
}

impl KeywordSet {
    /// Build a set from explicit keywords (lowercased).
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Tokenize a description into keywords, dropping stopwords and
    /// words shorter than three characters.
    pub fn from_description(description: &str) -> Self {
        Self::new(
            tokenize(description)
                .into_iter()
                .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(&w.as_str())),
        )
    }

    /// Whether `word` is a keyword.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Iterate keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Literal occurrences of all keywords in already-lowercased text.
    fn occurrences(&self, lower: &str) -> usize {
        self.words
            .iter()
            .map(|w| lower.match_indices(w.as_str()).count())
            .sum()
    }
}

/// Weighted keyword counting normalized by length.
///
/// Each persona keyword occurrence adds `1.0`, each job keyword occurrence
/// adds `2.0`; the total is divided by the word count plus one.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    persona: KeywordSet,
    job: KeywordSet,
    persona_weight: f64,
    job_weight: f64,
}

impl KeywordScorer {
    /// Create a scorer from keyword sets.
    pub fn new(persona: KeywordSet, job: KeywordSet) -> Self {
        Self {
            persona,
            job,
            persona_weight: 1.0,
            job_weight: 2.0,
        }
    }

    /// Derive keyword sets from a persona profile.
    pub fn from_profile(profile: &PersonaProfile) -> Self {
        Self::new(
            KeywordSet::from_description(&profile.persona),
            KeywordSet::from_description(&profile.job),
        )
    }

    /// Override the per-occurrence weights.
    pub fn with_weights(mut self, persona: f64, job: f64) -> Self {
        self.persona_weight = persona;
        self.job_weight = job;
        self
    }

    /// Persona keywords.
    pub fn persona_keywords(&self) -> &KeywordSet {
        &self.persona
    }

    /// Job keywords.
    pub fn job_keywords(&self) -> &KeywordSet {
        &self.job
    }
}

impl RelevanceScorer for KeywordScorer {
    fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let raw = self.persona.occurrences(&lower) as f64 * self.persona_weight
            + self.job.occurrences(&lower) as f64 * self.job_weight;
        raw / (text.split_whitespace().count() + 1) as f64
    }
}

/// Cosine similarity between term-frequency vectors of the section and
/// the persona+job text.
#[derive(Debug, Clone)]
pub struct TermVectorScorer {
    query: HashMap<String, f64>,
    query_norm: f64,
}

impl TermVectorScorer {
    /// Build the query vector from arbitrary text.
    pub fn new(query: &str) -> Self {
        let query = term_frequencies(query);
        let query_norm = norm(&query);
        Self { query, query_norm }
    }

    /// Build the query vector from a persona profile.
    pub fn from_profile(profile: &PersonaProfile) -> Self {
        Self::new(&format!("{} {}", profile.persona, profile.job))
    }
}

impl RelevanceScorer for TermVectorScorer {
    fn score(&self, text: &str) -> f64 {
        let doc = term_frequencies(text);
        let doc_norm = norm(&doc);
        if self.query_norm == 0.0 || doc_norm == 0.0 {
            return 0.0;
        }
        let dot: f64 = doc
            .iter()
            .filter_map(|(term, weight)| self.query.get(term).map(|q| q * weight))
            .sum();
        dot / (self.query_norm * doc_norm)
    }
}

/// Build the scorer selected by `kind`.
pub fn scorer_for(kind: ScorerKind, profile: &PersonaProfile) -> Box<dyn RelevanceScorer> {
    match kind {
        ScorerKind::Keyword => Box::new(KeywordScorer::from_profile(profile)),
        ScorerKind::TermVector => Box::new(TermVectorScorer::from_profile(profile)),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for word in tokenize(text) {
        if STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0.0) += 1.0;
    }
    counts
}

fn norm(vector: &HashMap<String, f64>) -> f64 {
    vector.values().map(|v| v * v).sum::<f64>().sqrt()
}
