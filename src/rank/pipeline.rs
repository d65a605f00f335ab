//! Persona-driven ranking over a batch of documents.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use super::assembler::SectionAssembler;
use super::ranker::rank_sections;
use super::scorer::{scorer_for, RelevanceScorer};
use crate::cache::{DocumentId, OutlineCache};
use crate::config::{PersonaProfile, RankOptions};
use crate::model::{DocumentStructure, RankingReport, ReportMetadata, Section};
use crate::parser::{LopdfSource, PageSource};
use crate::structure::StructureExtractor;

/// Timestamp format of the report metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Extract, assemble, score and rank sections across documents.
///
/// # Example
///
/// ```no_run
/// use docsift::rank::IntelligencePipeline;
/// use docsift::PersonaProfile;
///
/// let pipeline = IntelligencePipeline::new(PersonaProfile::load("input"));
/// let report = pipeline.run(&["input/a.pdf", "input/b.pdf"]);
/// println!("{} sections", report.extracted_sections.len());
/// ```
pub struct IntelligencePipeline {
    extractor: StructureExtractor,
    assembler: SectionAssembler,
    scorer: Arc<dyn RelevanceScorer>,
    cache: Option<Arc<dyn OutlineCache>>,
    profile: PersonaProfile,
    timestamp: Option<String>,
}

impl IntelligencePipeline {
    /// Create a pipeline with default options for `profile`.
    pub fn new(profile: PersonaProfile) -> Self {
        Self::with_options(RankOptions::default().with_profile(profile))
    }

    /// Create a pipeline from rank options.
    pub fn with_options(options: RankOptions) -> Self {
        Self {
            extractor: StructureExtractor::new(),
            assembler: SectionAssembler::from_options(&options),
            scorer: Arc::from(scorer_for(options.scorer, &options.profile)),
            cache: None,
            profile: options.profile,
            timestamp: None,
        }
    }

    /// Replace the structure extractor.
    pub fn with_extractor(mut self, extractor: StructureExtractor) -> Self {
        self.assembler = self
            .assembler
            .with_normalizer(extractor.normalizer().clone());
        self.extractor = extractor;
        self
    }

    /// Replace the relevance scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn RelevanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Reuse outlines from `cache` and store fresh ones in it.
    pub fn with_cache(mut self, cache: Arc<dyn OutlineCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a fixed processing timestamp instead of the current time.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Persona profile in use.
    pub fn profile(&self) -> &PersonaProfile {
        &self.profile
    }

    /// Rank the sections of every PDF in `paths`.
    ///
    /// Documents are processed in parallel when the extractor allows it;
    /// ranking starts only once all of them are assembled. Documents that
    /// cannot be opened contribute no sections.
    pub fn run<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> RankingReport {
        let per_document: Vec<(String, Vec<Section>)> = if self.extractor.options().parallel {
            paths.par_iter().map(|p| self.process_path(p.as_ref())).collect()
        } else {
            paths.iter().map(|p| self.process_path(p.as_ref())).collect()
        };
        self.finish(per_document)
    }

    /// Rank the sections of already-opened sources, named by file name.
    pub fn run_sources(&self, documents: &[(&str, &dyn PageSource)]) -> RankingReport {
        let per_document = documents
            .iter()
            .map(|(name, source)| {
                let id = DocumentId::new(*name);
                let structure = self.structure_for(&id, *source);
                let sections = self.assembler.assemble(id.name(), &structure, *source);
                (id.name().to_string(), sections)
            })
            .collect();
        self.finish(per_document)
    }

    fn process_path(&self, path: &Path) -> (String, Vec<Section>) {
        let id = DocumentId::from_path(path);
        let sections = match LopdfSource::open(path) {
            Ok(source) => {
                let structure = self.structure_for(&id, &source);
                self.assembler.assemble(id.name(), &structure, &source)
            }
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                Vec::new()
            }
        };
        if sections.is_empty() {
            log::warn!("No sections found in {}", id);
        }
        (id.name().to_string(), sections)
    }

    fn structure_for(&self, id: &DocumentId, source: &dyn PageSource) -> DocumentStructure {
        if let Some(cache) = &self.cache {
            match cache.get(id) {
                Ok(Some(structure)) => {
                    log::debug!("Outline cache hit for {}", id);
                    return structure;
                }
                Ok(None) => {}
                Err(e) => log::warn!("Outline cache read failed for {}: {}", id, e),
            }
        }

        let structure = self.extractor.extract(source);
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(id, &structure) {
                log::warn!("Outline cache write failed for {}: {}", id, e);
            }
        }
        structure
    }

    fn finish(&self, per_document: Vec<(String, Vec<Section>)>) -> RankingReport {
        let mut input_documents = Vec::with_capacity(per_document.len());
        let mut sections = Vec::new();
        for (name, document_sections) in per_document {
            input_documents.push(name);
            sections.extend(document_sections);
        }

        log::info!(
            "Ranking {} sections from {} documents",
            sections.len(),
            input_documents.len()
        );
        let ranked = rank_sections(sections, self.scorer.as_ref());

        let metadata = ReportMetadata {
            input_documents,
            persona: self.profile.persona.clone(),
            job_to_be_done: self.profile.job.clone(),
            processing_timestamp: self
                .timestamp
                .clone()
                .unwrap_or_else(|| chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
        };
        RankingReport::from_ranked(metadata, &ranked)
    }
}
