//! Title selection.

use std::collections::HashSet;

use super::repetition::RepetitionSet;
use crate::lang::LanguageNormalizer;
use crate::model::{DocumentMetadata, LocalizedText, Span};
use crate::parser::{CollectedDocument, TitleConflictPolicy};

/// Minimum length of a metadata title worth merging.
const MIN_METADATA_TITLE_LEN: usize = 4;

/// Pick the document title from the first page.
///
/// The title is every distinct non-boilerplate text on page 1 set in the
/// page's largest font, in visual order, each localized separately.
/// Texts landing in the same language are resolved by `policy`.
pub fn select_title(
    doc: &CollectedDocument,
    repetition: &RepetitionSet,
    normalizer: &LanguageNormalizer,
    policy: TitleConflictPolicy,
    metadata: Option<&DocumentMetadata>,
) -> LocalizedText {
    let mut title = LocalizedText::new();

    if let Some(first) = doc.page(1) {
        let spans: Vec<&Span> = first
            .spans
            .iter()
            .filter(|s| !repetition.contains(s.text()))
            .collect();

        let max_size = spans
            .iter()
            .map(|s| s.font_size())
            .max_by(f32::total_cmp);

        if let Some(max_size) = max_size {
            let mut seen = HashSet::new();
            for span in spans.iter().filter(|s| s.font_size() == max_size) {
                if !seen.insert(span.text()) {
                    continue;
                }
                let (language, text) = normalizer.normalize(span.text());
                match policy {
                    TitleConflictPolicy::FirstWins => {
                        title.insert_if_absent(language, text);
                    }
                    TitleConflictPolicy::LastWins => title.insert(language, text),
                }
            }
        }
    }

    if let Some(info_title) = metadata.and_then(|m| m.title.as_deref()) {
        let info_title = info_title.trim();
        if info_title.chars().count() >= MIN_METADATA_TITLE_LEN {
            let (language, text) = normalizer.normalize(info_title);
            if title.insert_if_absent(language, text) {
                log::debug!("Merged info dictionary title for {}", language);
            }
        }
    }

    title
}
