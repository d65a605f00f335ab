//! Batch-wide ranking.

use super::scorer::RelevanceScorer;
use crate::model::{RankedSection, Section};

/// Score every section and sort the batch by descending relevance.
///
/// The sort is stable: sections with equal scores keep their discovery
/// order. Ranks are dense, 1-based positions in the sorted order.
pub fn rank_sections(sections: Vec<Section>, scorer: &dyn RelevanceScorer) -> Vec<RankedSection> {
    let mut scored: Vec<(Section, f64)> = sections
        .into_iter()
        .map(|section| {
            let score = scorer.score(&section.joined_text());
            (section, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (section, relevance_score))| RankedSection {
            section,
            relevance_score,
            rank: i + 1,
        })
        .collect()
}
