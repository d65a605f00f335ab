//! Ranking-mode records: assembled sections and the batch report.

use serde::{Deserialize, Serialize};

use super::LocalizedText;

/// An outline entry paired with the surrounding page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Source document file name
    pub document: String,
    /// 1-based page number
    pub page: u32,
    /// Heading text per language
    pub title: LocalizedText,
    /// Excerpt per language
    pub excerpt: LocalizedText,
}

impl Section {
    /// Title and excerpt of every language joined into one string.
    pub fn joined_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.title.len() + self.excerpt.len());
        for (_, title) in self.title.iter() {
            parts.push(title);
        }
        for (_, excerpt) in self.excerpt.iter() {
            parts.push(excerpt);
        }
        parts.join(" ")
    }
}

/// A section after scoring and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// The scored section
    pub section: Section,
    /// Normalized relevance score
    pub relevance_score: f64,
    /// Dense 1-based rank across the whole batch
    pub rank: usize,
}

/// Batch-level metadata of a ranking report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input document file names in processing order
    pub input_documents: Vec<String>,
    /// Persona description
    pub persona: String,
    /// Job-to-be-done description
    pub job_to_be_done: String,
    /// Local time the report was produced (`%Y-%m-%dT%H:%M:%S`)
    pub processing_timestamp: String,
}

/// One ranked section as emitted in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document file name
    pub document: String,
    /// 1-based page number
    pub page_number: u32,
    /// Heading text per language
    pub section_title: LocalizedText,
    /// Dense 1-based rank
    pub importance_rank: usize,
}

/// Refined excerpt for a ranked section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSectionAnalysis {
    /// Source document file name
    pub document: String,
    /// 1-based page number
    pub page_number: u32,
    /// Excerpt per language
    pub refined_text: LocalizedText,
}

/// Ranking-mode output for a batch of documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingReport {
    /// Batch metadata
    pub metadata: ReportMetadata,
    /// Sections in rank order
    pub extracted_sections: Vec<ExtractedSection>,
    /// Excerpts in rank order
    pub sub_section_analysis: Vec<SubSectionAnalysis>,
}

impl RankingReport {
    /// Build the report from sections already sorted by rank.
    pub fn from_ranked(metadata: ReportMetadata, ranked: &[RankedSection]) -> Self {
        let extracted_sections = ranked
            .iter()
            .map(|r| ExtractedSection {
                document: r.section.document.clone(),
                page_number: r.section.page,
                section_title: r.section.title.clone(),
                importance_rank: r.rank,
            })
            .collect();
        let sub_section_analysis = ranked
            .iter()
            .map(|r| SubSectionAnalysis {
                document: r.section.document.clone(),
                page_number: r.section.page,
                refined_text: r.section.excerpt.clone(),
            })
            .collect();

        Self {
            metadata,
            extracted_sections,
            sub_section_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    fn section(document: &str, title: &str, excerpt: &str) -> Section {
        Section {
            document: document.to_string(),
            page: 2,
            title: LocalizedText::single(Language::En, title),
            excerpt: LocalizedText::single(Language::En, excerpt),
        }
    }

    #[test]
    fn test_joined_text_orders_titles_first() {
        let mut s = section("a.pdf", "Methods", "We sampled");
        s.title.insert(Language::Hi, "विधि");
        assert_eq!(s.joined_text(), "Methods विधि We sampled");
    }

    #[test]
    fn test_report_shape() {
        let metadata = ReportMetadata {
            input_documents: vec!["a.pdf".into()],
            persona: "Analyst".into(),
            job_to_be_done: "Summarize".into(),
            processing_timestamp: "2024-01-01T00:00:00".into(),
        };
        let ranked = vec![RankedSection {
            section: section("a.pdf", "Results", "Accuracy rose"),
            relevance_score: 0.5,
            rank: 1,
        }];
        let report = RankingReport::from_ranked(metadata, &ranked);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["metadata"]["persona"], "Analyst");
        assert_eq!(json["extracted_sections"][0]["page_number"], 2);
        assert_eq!(json["extracted_sections"][0]["importance_rank"], 1);
        assert_eq!(json["extracted_sections"][0]["section_title"]["en"], "Results");
        assert_eq!(
            json["sub_section_analysis"][0]["refined_text"]["en"],
            "Accuracy rose"
        );
    }
}
