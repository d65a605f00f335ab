//! Integration tests for ranking mode over in-memory documents.

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

use docsift::cache::{DirectoryCache, DocumentId, OutlineCache};
use docsift::parser::{InMemorySource, PageSource, StyledRun};
use docsift::rank::{IntelligencePipeline, RelevanceScorer};
use docsift::render::{report_to_json, JsonFormat};
use docsift::{
    DocumentStructure, ExcerptFallback, HeadingEntry, HeadingLevel, Language, LocalizedText,
    PersonaProfile, RankOptions, ScorerKind,
};
use tempfile::tempdir;

const TIMESTAMP: &str = "2025-03-01T12:00:00";

fn doc(sections: &[(&str, &str)]) -> InMemorySource {
    let mut source = InMemorySource::new();
    for (heading, body) in sections {
        source = source.with_page(vec![
            StyledRun::new(*heading, 18.0, "Helvetica-Bold"),
            StyledRun::new(*body, 10.0, "Helvetica"),
            StyledRun::new("Further plain paragraph text.", 10.0, "Helvetica"),
        ]);
    }
    source
}

fn pipeline(options: RankOptions) -> IntelligencePipeline {
    IntelligencePipeline::with_options(options).with_timestamp(TIMESTAMP)
}

/// Scores by a fixed table keyed on a phrase of the section text.
struct PhraseScores(Vec<(&'static str, f64)>);

impl RelevanceScorer for PhraseScores {
    fn score(&self, text: &str) -> f64 {
        self.0
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
    }
}

#[test]
fn test_ties_keep_discovery_order() {
    let source = doc(&[
        ("Alpha", "First section body."),
        ("Bravo", "Second section body."),
        ("Charlie", "Third section body."),
    ]);
    let report = pipeline(RankOptions::default())
        .with_scorer(Arc::new(PhraseScores(vec![
            ("First section", 0.4),
            ("Second section", 0.9),
            ("Third section", 0.9),
        ])))
        .run_sources(&[("tie.pdf", &source as &dyn PageSource)]);

    let order: Vec<(u32, usize)> = report
        .extracted_sections
        .iter()
        .map(|s| (s.page_number, s.importance_rank))
        .collect();
    assert_eq!(order, vec![(2, 1), (3, 2), (1, 3)]);
}

#[test]
fn test_ranks_cover_whole_batch() {
    let a = doc(&[
        ("Datasets", "Benchmark datasets for protein folding."),
        ("Hotels", "Rooms with a sea view."),
    ]);
    let b = doc(&[
        ("Methodologies", "Graph methodologies and literature review."),
        ("Recipes", "Tomato soup."),
        ("Performance", "Performance benchmarks on datasets."),
    ]);
    let report = pipeline(RankOptions::default())
        .run_sources(&[("a.pdf", &a as &dyn PageSource), ("b.pdf", &b as &dyn PageSource)]);

    let ranks: BTreeSet<usize> = report
        .extracted_sections
        .iter()
        .map(|s| s.importance_rank)
        .collect();
    assert_eq!(report.extracted_sections.len(), 5);
    assert_eq!(ranks, (1..=5).collect());
    assert_eq!(report.sub_section_analysis.len(), 5);

    // Off-topic sections end up at the bottom
    let bottom: BTreeSet<u32> = report.extracted_sections[3..]
        .iter()
        .map(|s| s.page_number)
        .collect();
    assert_eq!(bottom, BTreeSet::from([2]));
}

#[test]
fn test_sections_and_analysis_line_up() {
    let source = doc(&[("Overview", "Survey of methods."), ("Scope", "What is covered.")]);
    let report = pipeline(RankOptions::default().with_scorer(ScorerKind::TermVector))
        .run_sources(&[("s.pdf", &source as &dyn PageSource)]);

    for (section, analysis) in report
        .extracted_sections
        .iter()
        .zip(&report.sub_section_analysis)
    {
        assert_eq!(section.document, analysis.document);
        assert_eq!(section.page_number, analysis.page_number);
        for language in section.section_title.languages() {
            assert!(analysis.refined_text.contains(language));
        }
    }
}

#[test]
fn test_excerpt_fallback_policies() {
    // The heading normalizes to "Application form", which is not in the page text
    let source = doc(&[("Applicationform", "Fill in every field.")]);

    let lenient = pipeline(RankOptions::default())
        .run_sources(&[("form.pdf", &source as &dyn PageSource)]);
    assert_eq!(lenient.extracted_sections.len(), 1);
    assert_eq!(
        lenient.extracted_sections[0].section_title.get(Language::En),
        Some("Application form")
    );
    assert!(lenient.sub_section_analysis[0]
        .refined_text
        .get(Language::En)
        .unwrap_or_default()
        .starts_with("Applicationform"));

    let strict = pipeline(RankOptions::default().with_excerpt_fallback(ExcerptFallback::Drop))
        .run_sources(&[("form.pdf", &source as &dyn PageSource)]);
    assert!(strict.extracted_sections.is_empty());
    assert_eq!(strict.metadata.input_documents, vec!["form.pdf"]);
}

#[test]
fn test_excerpt_is_bounded() {
    let long_body = "word ".repeat(100);
    let source = doc(&[("Background", long_body.as_str())]);
    let report = pipeline(RankOptions::default().with_excerpt_len(50))
        .run_sources(&[("long.pdf", &source as &dyn PageSource)]);

    let excerpt = report.sub_section_analysis[0]
        .refined_text
        .get(Language::En)
        .unwrap_or_default();
    assert!(excerpt.starts_with("Background"));
    assert!(excerpt.chars().count() <= 50);
}

#[test]
fn test_directory_cache_supplies_outline() {
    let dir = tempdir().unwrap();
    let cache = Arc::new(DirectoryCache::new(dir.path()));
    let injected = DocumentStructure {
        outline: vec![HeadingEntry::new(
            HeadingLevel::H2,
            LocalizedText::single(Language::En, "Further plain"),
            1,
        )],
        ..Default::default()
    };
    cache.put(&DocumentId::new("cached.pdf"), &injected).unwrap();

    let source = doc(&[("Introduction", "Opening words.")]);
    let report = pipeline(RankOptions::default())
        .with_cache(cache.clone())
        .run_sources(&[("cached.pdf", &source as &dyn PageSource)]);

    assert_eq!(report.extracted_sections.len(), 1);
    assert_eq!(
        report.extracted_sections[0].section_title.get(Language::En),
        Some("Further plain")
    );
    assert!(report.sub_section_analysis[0]
        .refined_text
        .get(Language::En)
        .unwrap_or_default()
        .starts_with("Further plain paragraph"));

    // A fresh document is extracted and written through
    let other = doc(&[("Summary", "Closing words.")]);
    pipeline(RankOptions::default())
        .with_cache(cache.clone())
        .run_sources(&[("fresh.pdf", &other as &dyn PageSource)]);
    assert!(dir.path().join("fresh.json").is_file());
}

#[test]
fn test_profile_from_directory_lands_in_metadata() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("persona.txt"), "Food Contractor\n").unwrap();
    fs::write(dir.path().join("job.txt"), "Prepare a vegetarian buffet menu").unwrap();
    let profile = PersonaProfile::load(dir.path());

    let source = doc(&[
        ("Vegetarian Mains", "Lentil curry and vegetable lasagna for the buffet."),
        ("Desserts", "Chocolate cake."),
    ]);
    let report = pipeline(RankOptions::default().with_profile(profile))
        .run_sources(&[("menu.pdf", &source as &dyn PageSource)]);

    assert_eq!(report.metadata.persona, "Food Contractor");
    assert_eq!(report.metadata.job_to_be_done, "Prepare a vegetarian buffet menu");
    assert_eq!(report.metadata.processing_timestamp, TIMESTAMP);
    assert_eq!(report.extracted_sections[0].page_number, 1);
}

#[test]
fn test_report_json_shape() {
    let source = InMemorySource::new().with_page(vec![
        StyledRun::new("परिचय", 18.0, "Mangal-Bold"),
        StyledRun::new("यह एक परीक्षण है।", 10.0, "Mangal"),
    ]);
    let report = pipeline(RankOptions::default())
        .run_sources(&[("hi.pdf", &source as &dyn PageSource)]);
    let json: serde_json::Value =
        serde_json::from_str(&report_to_json(&report, JsonFormat::Pretty).unwrap()).unwrap();

    assert_eq!(json["metadata"]["input_documents"][0], "hi.pdf");
    let section = &json["extracted_sections"][0];
    assert_eq!(section["document"], "hi.pdf");
    assert_eq!(section["page_number"], 1);
    assert_eq!(section["importance_rank"], 1);
    assert_eq!(section["section_title"]["hi"], "परिचय");
    let keys: Vec<&String> = json["sub_section_analysis"][0]["refined_text"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(keys, vec!["hi"]);
}
