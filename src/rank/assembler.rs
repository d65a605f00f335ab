//! Section assembly: outline entries paired with page excerpts.

use std::collections::HashMap;

use crate::config::{ExcerptFallback, RankOptions};
use crate::lang::LanguageNormalizer;
use crate::model::{DocumentStructure, Language, LocalizedText, Section};
use crate::parser::PageSource;

/// Page text and its identified language.
struct PageText {
    text: String,
    language: Language,
}

/// Builds [`Section`]s from a document's outline and page text.
#[derive(Clone)]
pub struct SectionAssembler {
    excerpt_len: usize,
    fallback: ExcerptFallback,
    normalizer: LanguageNormalizer,
}

impl Default for SectionAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionAssembler {
    /// Create an assembler with 200-character excerpts.
    pub fn new() -> Self {
        Self::from_options(&RankOptions::default())
    }

    /// Create an assembler from rank options.
    pub fn from_options(options: &RankOptions) -> Self {
        Self {
            excerpt_len: options.excerpt_len,
            fallback: options.excerpt_fallback,
            normalizer: LanguageNormalizer::new(),
        }
    }

    /// Replace the language normalizer used to identify page language.
    pub fn with_normalizer(mut self, normalizer: LanguageNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the excerpt fallback policy.
    pub fn with_fallback(mut self, fallback: ExcerptFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Excerpt `page_text` at the first occurrence of `heading`.
    ///
    /// Returns `None` when the heading is missing and the policy is
    /// [`ExcerptFallback::Drop`], or when the excerpt is blank.
    pub fn excerpt(&self, page_text: &str, heading: &str) -> Option<String> {
        let start = match page_text.find(heading) {
            Some(offset) => offset,
            None => match self.fallback {
                ExcerptFallback::PageStart => 0,
                ExcerptFallback::Drop => return None,
            },
        };
        let excerpt: String = page_text[start..].chars().take(self.excerpt_len).collect();
        let excerpt = excerpt.trim();
        if excerpt.is_empty() {
            None
        } else {
            Some(excerpt.to_string())
        }
    }

    /// Assemble the sections of one document.
    ///
    /// A heading language contributes only when the page is identified as
    /// that language, or when it is English. Sections left without any
    /// excerpt are dropped.
    pub fn assemble(
        &self,
        document: &str,
        structure: &DocumentStructure,
        source: &dyn PageSource,
    ) -> Vec<Section> {
        let mut pages: HashMap<u32, Option<PageText>> = HashMap::new();
        let mut sections = Vec::new();

        for entry in &structure.outline {
            let page = pages
                .entry(entry.page)
                .or_insert_with(|| self.load_page(source, entry.page));
            let Some(page) = page else {
                continue;
            };

            let mut title = LocalizedText::new();
            let mut excerpt = LocalizedText::new();
            for (language, heading) in entry.text.iter() {
                if page.language != language && language != Language::En {
                    continue;
                }
                if let Some(text) = self.excerpt(&page.text, heading) {
                    title.insert(language, heading);
                    excerpt.insert(language, text);
                }
            }

            if excerpt.is_empty() {
                log::debug!(
                    "{}: no excerpt for heading on page {}, dropping section",
                    document,
                    entry.page
                );
                continue;
            }
            sections.push(Section {
                document: document.to_string(),
                page: entry.page,
                title,
                excerpt,
            });
        }

        sections
    }

    fn load_page(&self, source: &dyn PageSource, number: u32) -> Option<PageText> {
        match source.page_text(number) {
            Ok(text) if !text.is_empty() => {
                let language = self.normalizer.identify(&text);
                Some(PageText { text, language })
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("No text for page {}: {}", number, e);
                None
            }
        }
    }
}
