//! Ranking configuration: persona profile and ranking options.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persona used when `persona.txt` is missing.
pub const DEFAULT_PERSONA: &str = "PhD Researcher in Computational Biology";

/// Job used when `job.txt` is missing.
pub const DEFAULT_JOB: &str = "Prepare a comprehensive literature review focusing on methodologies, datasets, and performance benchmarks";

/// File name of the persona description.
pub const PERSONA_FILE: &str = "persona.txt";

/// File name of the job-to-be-done description.
pub const JOB_FILE: &str = "job.txt";

/// Who is reading and what they are trying to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Reader description
    pub persona: String,
    /// Task description
    pub job: String,
}

impl Default for PersonaProfile {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA, DEFAULT_JOB)
    }
}

impl PersonaProfile {
    /// Create a profile from explicit descriptions.
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job: job.into(),
        }
    }

    /// Load `persona.txt` and `job.txt` from `dir`.
    ///
    /// Missing or unreadable files fall back to the defaults.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::load_files(dir.join(PERSONA_FILE), dir.join(JOB_FILE))
    }

    /// Load the profile from explicit file paths.
    pub fn load_files<P: AsRef<Path>, Q: AsRef<Path>>(persona: P, job: Q) -> Self {
        Self {
            persona: read_or_default(persona.as_ref(), DEFAULT_PERSONA),
            job: read_or_default(job.as_ref(), DEFAULT_JOB),
        }
    }
}

fn read_or_default(path: &Path, default: &str) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text.trim().to_string(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} not found, using default", path.display());
            default.to_string()
        }
        Err(e) => {
            log::warn!("Could not read {}: {}, using default", path.display(), e);
            default.to_string()
        }
    }
}

/// Scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerKind {
    /// Weighted keyword occurrence counting
    #[default]
    Keyword,
    /// Bag-of-words cosine similarity
    TermVector,
}

/// What to do when a heading is not found verbatim in its page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcerptFallback {
    /// Take the excerpt from the start of the page
    #[default]
    PageStart,
    /// Skip that language for the section
    Drop,
}

/// Options for ranking mode.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Maximum excerpt length in characters
    pub excerpt_len: usize,

    /// Excerpt policy for headings missing from the page text
    pub excerpt_fallback: ExcerptFallback,

    /// Scoring strategy
    pub scorer: ScorerKind,

    /// Persona and job descriptions
    pub profile: PersonaProfile,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            excerpt_len: 200,
            excerpt_fallback: ExcerptFallback::default(),
            scorer: ScorerKind::default(),
            profile: PersonaProfile::default(),
        }
    }
}

impl RankOptions {
    /// Create rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum excerpt length.
    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }

    /// Set the excerpt fallback policy.
    pub fn with_excerpt_fallback(mut self, fallback: ExcerptFallback) -> Self {
        self.excerpt_fallback = fallback;
        self
    }

    /// Set the scoring strategy.
    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }

    /// Set the persona profile.
    pub fn with_profile(mut self, profile: PersonaProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempdir().unwrap();
        let profile = PersonaProfile::load(dir.path());
        assert_eq!(profile, PersonaProfile::default());
        assert_eq!(profile.persona, DEFAULT_PERSONA);
    }

    #[test]
    fn test_files_are_trimmed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PERSONA_FILE), "  Travel Planner\n").unwrap();
        let profile = PersonaProfile::load(dir.path());
        assert_eq!(profile.persona, "Travel Planner");
        assert_eq!(profile.job, DEFAULT_JOB);
    }

    #[test]
    fn test_explicit_paths() {
        let dir = tempdir().unwrap();
        let job = dir.path().join("task.md");
        fs::write(&job, "Plan a trip for ten friends").unwrap();
        let profile = PersonaProfile::load_files(dir.path().join("nope.txt"), &job);
        assert_eq!(profile.persona, DEFAULT_PERSONA);
        assert_eq!(profile.job, "Plan a trip for ten friends");
    }

    #[test]
    fn test_rank_options_builder() {
        let options = RankOptions::new()
            .with_excerpt_len(80)
            .with_excerpt_fallback(ExcerptFallback::Drop)
            .with_scorer(ScorerKind::TermVector);
        assert_eq!(options.excerpt_len, 80);
        assert_eq!(options.excerpt_fallback, ExcerptFallback::Drop);
        assert_eq!(options.scorer, ScorerKind::TermVector);
        assert_eq!(options.profile, PersonaProfile::default());
    }
}
