//! Document structure extraction.
//!
//! Turns the styled spans of a document into a title, a leveled outline
//! and a list of tables. Headings are judged relative to the document's
//! own body-text size, so no absolute size thresholds are involved.
//!
//! # Example
//!
//! ```no_run
//! use docsift::structure::StructureExtractor;
//!
//! let structure = StructureExtractor::new().extract_file("report.pdf");
//! for entry in &structure.outline {
//!     println!("{} p{} {}", entry.level, entry.page, entry.text.joined());
//! }
//! ```

mod baseline;
mod heading;
mod repetition;
mod tables;
mod title;

use std::path::Path;
use std::sync::Arc;

pub use baseline::estimate_baseline;
pub use heading::{
    build_outline, is_all_uppercase, starts_with_list_marker, HeadingCandidate, HeadingClassifier,
    HeadingRule, LevelTiers, RuleContext,
};
pub use repetition::RepetitionSet;
pub use tables::build_tables;
pub use title::select_title;

use crate::lang::LanguageNormalizer;
use crate::model::DocumentStructure;
use crate::parser::{
    ExtractOptions, LopdfSource, PageSource, SpanCollector, StreamTableDetector,
    TableGridExtractor,
};

/// Extracts [`DocumentStructure`] from page sources.
#[derive(Clone)]
pub struct StructureExtractor {
    options: ExtractOptions,
    normalizer: LanguageNormalizer,
    classifier: HeadingClassifier,
    tables: Arc<dyn TableGridExtractor>,
    collector: Arc<SpanCollector>,
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureExtractor {
    /// Create an extractor with default options and collaborators.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            options,
            normalizer: LanguageNormalizer::new(),
            classifier: HeadingClassifier::new(),
            tables: Arc::new(StreamTableDetector::new()),
            collector: Arc::new(SpanCollector::new()),
        }
    }

    /// Replace the language normalizer.
    pub fn with_normalizer(mut self, normalizer: LanguageNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Replace the heading rule chain.
    pub fn with_classifier(mut self, classifier: HeadingClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the table grid extractor.
    pub fn with_table_extractor(mut self, extractor: Arc<dyn TableGridExtractor>) -> Self {
        self.tables = extractor;
        self
    }

    /// Extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Language normalizer shared with downstream stages.
    pub fn normalizer(&self) -> &LanguageNormalizer {
        &self.normalizer
    }

    /// Extract title, outline and tables from `source`.
    pub fn extract(&self, source: &dyn PageSource) -> DocumentStructure {
        let doc = self.collector.collect(source);
        let baseline = estimate_baseline(doc.spans(), &self.options);
        let repetition = RepetitionSet::detect(&doc, &self.options);

        if self.options.verbose {
            log::debug!(
                "{} pages, {} spans, baseline {:.1}pt, {} repeated strings",
                doc.total_pages,
                doc.spans().count(),
                baseline,
                repetition.len()
            );
        }

        let metadata = if self.options.merge_metadata_title {
            Some(source.metadata())
        } else {
            None
        };
        let title = select_title(
            &doc,
            &repetition,
            &self.normalizer,
            self.options.title_policy,
            metadata.as_ref(),
        );

        let candidates = self
            .classifier
            .candidates(&doc, &repetition, baseline, &self.options);
        let outline = build_outline(&candidates, &self.normalizer, &self.options);

        let tables = build_tables(
            &doc,
            self.tables.as_ref(),
            &self.normalizer,
            &self.collector,
            &self.options,
        );

        DocumentStructure {
            title,
            outline,
            tables,
        }
    }

    /// Open a PDF and extract its structure.
    ///
    /// A document that cannot be opened yields the empty structure.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> DocumentStructure {
        let path = path.as_ref();
        match LopdfSource::open(path) {
            Ok(source) => self.extract(&source),
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                DocumentStructure::empty()
            }
        }
    }
}
