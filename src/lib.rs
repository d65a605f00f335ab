//! # docsift
//!
//! Outline, table and persona-ranked section extraction for PDFs in
//! English, Hindi and Marathi.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{extract_file, render, JsonFormat};
//!
//! fn main() -> docsift::Result<()> {
//!     // Title, outline and tables
//!     let structure = extract_file("document.pdf");
//!
//!     let json = render::structure_to_json(&structure, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Relative heading detection**: headings are judged against the
//!   document's own body-text size, not absolute point sizes
//! - **Boilerplate filtering**: running headers, footers and watermarks are
//!   kept out of the outline
//! - **Devanagari support**: Hindi and Marathi text is identified and
//!   tokenized separately from English
//! - **Stream-mode tables**: tables found from text alignment alone
//! - **Persona ranking**: sections across a batch ranked for a reader and task
//! - **Parallel processing**: uses Rayon for multi-document batches

pub mod cache;
pub mod config;
pub mod error;
pub mod lang;
pub mod model;
pub mod parser;
pub mod rank;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use cache::{DirectoryCache, DocumentId, MemoryCache, OutlineCache};
pub use config::{ExcerptFallback, PersonaProfile, RankOptions, ScorerKind};
pub use error::{Error, Result};
pub use lang::{IntegrityChecker, LanguageNormalizer};
pub use model::{
    DocumentMetadata, DocumentStructure, ExtractedTable, HeadingEntry, HeadingLevel, Language,
    LocalizedText, RankingReport, Section, Span,
};
pub use parser::{ExtractOptions, LopdfSource, PageSource, TableScope, TitleConflictPolicy};
pub use rank::IntelligencePipeline;
pub use render::JsonFormat;
pub use structure::StructureExtractor;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

/// Extract the structure of a PDF file with default options.
///
/// A file that cannot be opened yields [`DocumentStructure::empty`].
///
/// # Example
///
/// ```no_run
/// use docsift::extract_file;
///
/// let structure = extract_file("document.pdf");
/// println!("{} headings", structure.outline.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> DocumentStructure {
    StructureExtractor::new().extract_file(path)
}

/// Extract the structure of a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> DocumentStructure {
    StructureExtractor::with_options(options).extract_file(path)
}

/// Extract the structure of a PDF held in memory.
///
/// Unlike [`extract_file`], data that is not a PDF is an error.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentStructure> {
    let source = LopdfSource::from_bytes(data)?;
    Ok(StructureExtractor::new().extract(&source))
}

/// List the PDF files of a directory (case-insensitive extension), sorted.
pub fn pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Outcome of one document in [`outline_directory`].
#[derive(Debug, Clone)]
pub struct OutlineResult {
    /// Input PDF
    pub input: PathBuf,
    /// Written JSON file
    pub output: PathBuf,
    /// Number of outline entries written
    pub headings: usize,
    /// Number of tables written
    pub tables: usize,
}

/// Structure mode over a directory: one `<stem>.json` per PDF.
///
/// Documents that cannot be opened still get a file holding the empty
/// structure. Only directory-level I/O failures are errors.
pub fn outline_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ExtractOptions,
) -> Result<Vec<OutlineResult>> {
    let output = output.as_ref();
    fs::create_dir_all(output)?;
    let files = pdf_files(input)?;
    let extractor = StructureExtractor::with_options(options);

    let process = |path: &PathBuf| -> Result<OutlineResult> {
        let structure = extractor.extract_file(path);
        let target = output.join(format!("{}.json", DocumentId::from_path(path).stem()));
        let json = render::structure_to_json(&structure, JsonFormat::Pretty)?;
        fs::write(&target, json)?;
        log::info!("{} -> {}", path.display(), target.display());
        Ok(OutlineResult {
            input: path.clone(),
            output: target,
            headings: structure.outline.len(),
            tables: structure.tables.len(),
        })
    };

    if extractor.options().parallel {
        files.par_iter().map(process).collect()
    } else {
        files.iter().map(process).collect()
    }
}
