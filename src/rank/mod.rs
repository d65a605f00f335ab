//! Ranking mode: persona-relevant sections across a document batch.

mod assembler;
mod pipeline;
mod ranker;
mod scorer;

pub use assembler::SectionAssembler;
pub use pipeline::{IntelligencePipeline, TIMESTAMP_FORMAT};
pub use ranker::rank_sections;
pub use scorer::{scorer_for, KeywordScorer, KeywordSet, RelevanceScorer, TermVectorScorer};
