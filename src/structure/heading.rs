//! Heading classification.
//!
//! Candidacy is decided by an ordered list of [`HeadingRule`]s; the first
//! rule that matches wins. Levels are assigned afterwards over the whole
//! document, from the distinct candidate font sizes.

use std::collections::HashSet;
use std::fmt;

use super::repetition::RepetitionSet;
use crate::lang::LanguageNormalizer;
use crate::model::{HeadingEntry, HeadingLevel, LocalizedText, Span};
use crate::parser::{CollectedDocument, ExtractOptions};

/// One heading-candidacy rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingRule {
    /// Bold and larger than `baseline * bold_ratio`
    BoldAndLarger,
    /// First span of its page and larger than `baseline * leading_ratio`
    LeadingLarge,
    /// All uppercase and at least baseline size
    UppercaseAtBaseline,
    /// Immediately followed by a list item
    PrecedesList,
}

impl HeadingRule {
    /// Rules in the default priority order.
    pub const DEFAULT_ORDER: [HeadingRule; 4] = [
        HeadingRule::BoldAndLarger,
        HeadingRule::LeadingLarge,
        HeadingRule::UppercaseAtBaseline,
        HeadingRule::PrecedesList,
    ];

    /// Whether the rule accepts the span in `ctx`.
    pub fn matches(self, ctx: &RuleContext<'_>) -> bool {
        let size = ctx.span.font_size();
        match self {
            HeadingRule::BoldAndLarger => {
                ctx.span.is_bold() && size > ctx.baseline * ctx.options.bold_ratio
            }
            HeadingRule::LeadingLarge => {
                ctx.span.position_index() == 0 && size > ctx.baseline * ctx.options.leading_ratio
            }
            HeadingRule::UppercaseAtBaseline => {
                is_all_uppercase(ctx.span.text()) && size >= ctx.baseline
            }
            HeadingRule::PrecedesList => ctx
                .next
                .map(|next| starts_with_list_marker(next.text()))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for HeadingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeadingRule::BoldAndLarger => "bold-and-larger",
            HeadingRule::LeadingLarge => "leading-large",
            HeadingRule::UppercaseAtBaseline => "uppercase",
            HeadingRule::PrecedesList => "precedes-list",
        };
        f.write_str(name)
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Span under test
    pub span: &'a Span,
    /// Next span on the same page
    pub next: Option<&'a Span>,
    /// Document body-text size
    pub baseline: f32,
    /// Thresholds
    pub options: &'a ExtractOptions,
}

/// A span accepted by a rule, before level assignment.
#[derive(Debug, Clone, Copy)]
pub struct HeadingCandidate<'a> {
    /// The heading span
    pub span: &'a Span,
    /// Rule that accepted it
    pub rule: HeadingRule,
}

/// Ordered rule chain.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    rules: Vec<HeadingRule>,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingClassifier {
    /// Classifier with the default rule order.
    pub fn new() -> Self {
        Self::with_rules(HeadingRule::DEFAULT_ORDER.to_vec())
    }

    /// Classifier with a custom rule order.
    pub fn with_rules(rules: Vec<HeadingRule>) -> Self {
        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[HeadingRule] {
        &self.rules
    }

    /// First rule that accepts the span, if any.
    pub fn classify(&self, ctx: &RuleContext<'_>) -> Option<HeadingRule> {
        self.rules.iter().copied().find(|rule| rule.matches(ctx))
    }

    /// Scan every page for heading candidates, in document order.
    ///
    /// Boilerplate and spans shorter than the minimum length are skipped.
    pub fn candidates<'a>(
        &self,
        doc: &'a CollectedDocument,
        repetition: &RepetitionSet,
        baseline: f32,
        options: &'a ExtractOptions,
    ) -> Vec<HeadingCandidate<'a>> {
        let mut candidates = Vec::new();
        for page in &doc.pages {
            for (i, span) in page.spans.iter().enumerate() {
                if repetition.contains(span.text()) || span.char_len() < options.min_heading_len {
                    continue;
                }
                let ctx = RuleContext {
                    span,
                    next: page.spans.get(i + 1),
                    baseline,
                    options,
                };
                match self.classify(&ctx) {
                    Some(rule) => {
                        if options.verbose {
                            log::debug!(
                                "page {} span {}: heading by {} ({:.1}pt, baseline {:.1}) {:?}",
                                page.number,
                                i,
                                rule,
                                span.font_size(),
                                baseline,
                                span.text()
                            );
                        }
                        candidates.push(HeadingCandidate { span, rule });
                    }
                    None if options.verbose => {
                        log::trace!("page {} span {}: not a heading", page.number, i);
                    }
                    None => {}
                }
            }
        }
        candidates
    }
}

/// Size tiers for level assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTiers {
    sizes: Vec<f32>,
    tolerance: f32,
}

impl LevelTiers {
    /// Build tiers from candidate font sizes.
    pub fn new(sizes: impl IntoIterator<Item = f32>, tolerance: f32) -> Self {
        let mut sizes: Vec<f32> = sizes.into_iter().collect();
        sizes.sort_by(|a, b| b.total_cmp(a));
        sizes.dedup();
        Self { sizes, tolerance }
    }

    /// Distinct sizes, largest first.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Level of a heading with the given font size.
    pub fn level(&self, size: f32) -> HeadingLevel {
        match self.sizes.as_slice() {
            [first, ..] if size >= first * self.tolerance => HeadingLevel::H1,
            [_, second, ..] if size >= second * self.tolerance => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

/// Assign levels, normalize text and drop exact repeats.
///
/// Repeats share level, normalized text and page; the first one is kept.
pub fn build_outline(
    candidates: &[HeadingCandidate<'_>],
    normalizer: &LanguageNormalizer,
    options: &ExtractOptions,
) -> Vec<HeadingEntry> {
    let tiers = LevelTiers::new(
        candidates.iter().map(|c| c.span.font_size()),
        options.tier_tolerance,
    );

    let mut seen: HashSet<(HeadingLevel, LocalizedText, u32)> = HashSet::new();
    let mut outline = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let level = tiers.level(candidate.span.font_size());
        let text = normalizer.localize(candidate.span.text());
        let page = candidate.span.page();
        if seen.insert((level, text.clone(), page)) {
            outline.push(HeadingEntry::new(level, text, page));
        }
    }
    outline
}

/// Uppercase test: no lowercase letters, at least one uppercase letter,
/// more than two characters.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().count() > 2
        && text.chars().any(char::is_uppercase)
        && !text.chars().any(char::is_lowercase)
}

/// Bullet glyph, dash, asterisk or digit at the start of the text.
pub fn starts_with_list_marker(text: &str) -> bool {
    match text.trim_start().chars().next() {
        Some(c) => {
            matches!(c, '\u{2022}' | '\u{2023}' | '\u{25E6}' | '\u{2043}' | '\u{2219}' | '-' | '*')
                || c.is_numeric()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Language};
    use crate::parser::PageSpans;

    fn span(text: &str, size: f32, bold: bool, page: u32, index: usize) -> Span {
        Span::new(text, size, bold, page, index, BoundingBox::default()).unwrap()
    }

    fn ctx<'a>(span: &'a Span, next: Option<&'a Span>, options: &'a ExtractOptions) -> RuleContext<'a> {
        RuleContext {
            span,
            next,
            baseline: 10.0,
            options,
        }
    }

    #[test]
    fn test_rules_individually() {
        let options = ExtractOptions::default();

        let bold = span("Methods", 11.5, true, 1, 3);
        assert!(HeadingRule::BoldAndLarger.matches(&ctx(&bold, None, &options)));
        let bold_small = span("Methods", 11.0, true, 1, 3);
        assert!(!HeadingRule::BoldAndLarger.matches(&ctx(&bold_small, None, &options)));

        let leading = span("Overview", 12.5, false, 2, 0);
        assert!(HeadingRule::LeadingLarge.matches(&ctx(&leading, None, &options)));
        let not_first = span("Overview", 12.5, false, 2, 1);
        assert!(!HeadingRule::LeadingLarge.matches(&ctx(&not_first, None, &options)));

        let caps = span("RESULTS", 10.0, false, 1, 4);
        assert!(HeadingRule::UppercaseAtBaseline.matches(&ctx(&caps, None, &options)));
        let small_caps = span("RESULTS", 9.0, false, 1, 4);
        assert!(!HeadingRule::UppercaseAtBaseline.matches(&ctx(&small_caps, None, &options)));

        let lead_in = span("Required documents", 10.0, false, 1, 5);
        let item = span("• Passport", 10.0, false, 1, 6);
        assert!(HeadingRule::PrecedesList.matches(&ctx(&lead_in, Some(&item), &options)));
        assert!(!HeadingRule::PrecedesList.matches(&ctx(&lead_in, None, &options)));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let options = ExtractOptions::default();
        let s = span("SUMMARY", 13.0, true, 1, 0);
        let c = ctx(&s, None, &options);

        assert_eq!(
            HeadingClassifier::new().classify(&c),
            Some(HeadingRule::BoldAndLarger)
        );
        let reordered = HeadingClassifier::with_rules(vec![
            HeadingRule::UppercaseAtBaseline,
            HeadingRule::BoldAndLarger,
        ]);
        assert_eq!(reordered.classify(&c), Some(HeadingRule::UppercaseAtBaseline));
        assert_eq!(HeadingClassifier::with_rules(vec![]).classify(&c), None);
    }

    #[test]
    fn test_candidates_skip_boilerplate_and_short_text() {
        let options = ExtractOptions::default();
        let doc = CollectedDocument {
            pages: vec![PageSpans {
                number: 1,
                spans: vec![
                    span("A", 20.0, true, 1, 0),
                    span("Chapter One", 20.0, true, 1, 1),
                    span("body text here", 10.0, false, 1, 2),
                ],
            }],
            total_pages: 1,
        };
        let candidates =
            HeadingClassifier::new().candidates(&doc, &RepetitionSet::default(), 10.0, &options);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].span.text(), "Chapter One");
    }

    #[test]
    fn test_level_tiers() {
        let tiers = LevelTiers::new([18.0, 14.0, 18.0, 12.0, 17.5], 0.95);
        assert_eq!(tiers.sizes(), &[18.0, 17.5, 14.0, 12.0]);
        assert_eq!(tiers.level(18.0), HeadingLevel::H1);
        assert_eq!(tiers.level(17.5), HeadingLevel::H1);
        assert_eq!(tiers.level(14.0), HeadingLevel::H3);
    }

    #[test]
    fn test_single_size_is_all_h1() {
        let tiers = LevelTiers::new([15.0, 15.0], 0.95);
        assert_eq!(tiers.level(15.0), HeadingLevel::H1);
    }

    #[test]
    fn test_second_tier() {
        let tiers = LevelTiers::new([24.0, 16.0, 12.0], 0.95);
        assert_eq!(tiers.level(24.0), HeadingLevel::H1);
        assert_eq!(tiers.level(16.0), HeadingLevel::H2);
        assert_eq!(tiers.level(12.0), HeadingLevel::H3);
    }

    #[test]
    fn test_build_outline_dedups() {
        let options = ExtractOptions::default();
        let spans = [
            span("Results", 16.0, true, 2, 0),
            span("Results", 16.0, true, 2, 4),
            span("Results", 16.0, true, 3, 0),
        ];
        let candidates: Vec<_> = spans
            .iter()
            .map(|s| HeadingCandidate {
                span: s,
                rule: HeadingRule::BoldAndLarger,
            })
            .collect();
        let outline = build_outline(&candidates, &LanguageNormalizer::new(), &options);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].page, 2);
        assert_eq!(outline[1].page, 3);
        assert_eq!(outline[0].text.get(Language::En), Some("Results"));
    }

    #[test]
    fn test_uppercase() {
        assert!(is_all_uppercase("INTRODUCTION"));
        assert!(is_all_uppercase("PART 2: DATA"));
        assert!(!is_all_uppercase("AB"));
        assert!(!is_all_uppercase("Introduction"));
        assert!(!is_all_uppercase("123"));
        assert!(!is_all_uppercase("परिचय"));
    }

    #[test]
    fn test_list_markers() {
        assert!(starts_with_list_marker("• item"));
        assert!(starts_with_list_marker("  - item"));
        assert!(starts_with_list_marker("3. item"));
        assert!(starts_with_list_marker("१. पहला"));
        assert!(!starts_with_list_marker("Item"));
        assert!(!starts_with_list_marker(""));
    }
}
