//! docsift CLI - PDF outline extraction and section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsift::{
    outline_directory, pdf_files, render, DirectoryCache, ExcerptFallback, ExtractOptions,
    IntegrityChecker, IntelligencePipeline, JsonFormat, LopdfSource, PageSource, PersonaProfile,
    RankOptions, ScorerKind, StructureExtractor, TableScope, TitleConflictPolicy,
};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title, outline and tables for every PDF in a directory
    Outline {
        /// Input directory
        #[arg(short, long, env = "INPUT_DIR", default_value = "input")]
        input: PathBuf,

        /// Output directory (one JSON file per PDF)
        #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Extract title, outline and tables of a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Rank sections of all PDFs in a directory for a persona and job
    Rank {
        /// Input directory (PDFs plus optional persona.txt / job.txt)
        #[arg(short, long, env = "INPUT_DIR", default_value = "input")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Report file name inside the output directory
        #[arg(long, default_value = "ranking.json")]
        report: String,

        /// Persona description file (overrides persona.txt)
        #[arg(long, value_name = "FILE")]
        persona: Option<PathBuf>,

        /// Job description file (overrides job.txt)
        #[arg(long, value_name = "FILE")]
        job: Option<PathBuf>,

        /// Scoring strategy
        #[arg(long, value_enum, default_value = "keyword")]
        scorer: ScorerArg,

        /// Drop headings not found verbatim in their page text
        #[arg(long)]
        drop_unmatched: bool,

        /// Reuse per-document outlines stored in this directory
        #[arg(long, value_name = "DIR")]
        cache: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check JSON outputs for garbled Devanagari text
    Validate {
        /// JSON file or directory of JSON files
        #[arg(value_name = "PATH", env = "OUTPUT_DIR", default_value = "output")]
        path: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct ExtractArgs {
    /// Trace every heading decision (use with RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,

    /// Which text wins when two title lines share a language
    #[arg(long, value_enum, default_value = "first")]
    title_policy: TitlePolicyArg,

    /// Fill missing title languages from the document info title
    #[arg(long)]
    metadata_title: bool,

    /// Only scan the first N pages for tables
    #[arg(long, value_name = "N")]
    table_pages: Option<u32>,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        let scope = match self.table_pages {
            Some(n) => TableScope::FirstPages(n),
            None => TableScope::All,
        };
        ExtractOptions::new()
            .verbose(self.verbose)
            .with_title_policy(self.title_policy.into())
            .with_metadata_title(self.metadata_title)
            .with_table_scope(scope)
            .with_parallel(!self.sequential)
    }
}

impl Default for ExtractArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            title_policy: TitlePolicyArg::First,
            metadata_title: false,
            table_pages: None,
            sequential: false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TitlePolicyArg {
    /// Keep the first line in visual order
    First,
    /// Keep the last line in visual order
    Last,
}

impl From<TitlePolicyArg> for TitleConflictPolicy {
    fn from(arg: TitlePolicyArg) -> Self {
        match arg {
            TitlePolicyArg::First => TitleConflictPolicy::FirstWins,
            TitlePolicyArg::Last => TitleConflictPolicy::LastWins,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ScorerArg {
    /// Weighted keyword counting
    Keyword,
    /// Bag-of-words cosine similarity
    TermVector,
}

impl From<ScorerArg> for ScorerKind {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Keyword => ScorerKind::Keyword,
            ScorerArg::TermVector => ScorerKind::TermVector,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            extract,
        }) => cmd_outline(&input, &output, &extract),
        Some(Commands::Extract {
            input,
            output,
            compact,
            extract,
        }) => cmd_extract(&input, output.as_deref(), compact, &extract),
        Some(Commands::Rank {
            input,
            output,
            report,
            persona,
            job,
            scorer,
            drop_unmatched,
            cache,
            sequential,
            compact,
        }) => cmd_rank(RankArgs {
            input,
            output,
            report,
            persona,
            job,
            scorer,
            drop_unmatched,
            cache,
            sequential,
            compact,
        }),
        Some(Commands::Validate { path, json }) => cmd_validate(&path, json),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: structure mode over INPUT_DIR / OUTPUT_DIR
            let input = std::env::var_os("INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("input"));
            let output = std::env::var_os("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output"));
            if input.is_dir() {
                cmd_outline(&input, &output, &ExtractArgs::default())
            } else {
                println!("{}", "Usage: docsift <COMMAND>".yellow());
                println!("       docsift --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner(&format!("Extracting outlines from {}", input.display()));
    let results = outline_directory(input, output, args.options())?;
    pb.finish_and_clear();

    if results.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    println!("{}", "Output files:".green().bold());
    for (i, result) in results.iter().enumerate() {
        let branch = if i + 1 == results.len() { "└─" } else { "├─" };
        let name = result
            .output
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        println!(
            "  {} {} ({} headings, {} tables)",
            branch.dimmed(),
            name,
            result.headings,
            result.tables
        );
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let structure = StructureExtractor::with_options(args.options()).extract_file(input);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::structure_to_json(&structure, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

struct RankArgs {
    input: PathBuf,
    output: PathBuf,
    report: String,
    persona: Option<PathBuf>,
    job: Option<PathBuf>,
    scorer: ScorerArg,
    drop_unmatched: bool,
    cache: Option<PathBuf>,
    sequential: bool,
    compact: bool,
}

fn cmd_rank(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let persona_path = args
        .persona
        .unwrap_or_else(|| args.input.join(docsift::config::PERSONA_FILE));
    let job_path = args
        .job
        .unwrap_or_else(|| args.input.join(docsift::config::JOB_FILE));
    let profile = PersonaProfile::load_files(&persona_path, &job_path);

    let fallback = if args.drop_unmatched {
        ExcerptFallback::Drop
    } else {
        ExcerptFallback::PageStart
    };
    let options = RankOptions::new()
        .with_profile(profile)
        .with_scorer(args.scorer.into())
        .with_excerpt_fallback(fallback);

    let extractor = StructureExtractor::with_options(
        ExtractOptions::new().with_parallel(!args.sequential),
    );
    let mut pipeline = IntelligencePipeline::with_options(options).with_extractor(extractor);
    if let Some(dir) = args.cache {
        pipeline = pipeline.with_cache(Arc::new(DirectoryCache::new(dir)));
    }

    let files = pdf_files(&args.input)?;
    if files.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), args.input.display());
    }

    println!("{}: {}", "Persona".bold(), pipeline.profile().persona);
    println!("{}: {}", "Job".bold(), pipeline.profile().job);

    let pb = spinner(&format!("Ranking sections of {} documents", files.len()));
    let report = pipeline.run(&files);
    pb.finish_and_clear();

    let format = if args.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    fs::create_dir_all(&args.output)?;
    let path = args.output.join(&args.report);
    fs::write(&path, render::report_to_json(&report, format)?)?;

    println!(
        "{} {} sections from {} documents",
        "Ranked".green().bold(),
        report.extracted_sections.len(),
        report.metadata.input_documents.len()
    );
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_validate(path: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let checker = IntegrityChecker::new();

    if path.is_dir() {
        let result = checker.validate_directory(path)?;
        if as_json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!("{}", "Text Integrity".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}: {}", "Files".bold(), result.total_files_processed);
        println!("{}: {}", "Files with issues".bold(), result.files_with_issues);
        println!("{}: {}", "Garbled texts".bold(), result.total_issues_found);
        println!(
            "{}: {:.1}%",
            "Overall accuracy".bold(),
            result.overall_accuracy * 100.0
        );
        for summary in result.detailed_results.iter().filter(|s| s.garbled_texts > 0) {
            let name = summary
                .file
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!(
                "  {} {} ({} of {} garbled)",
                "✗".red(),
                name,
                summary.garbled_texts,
                summary.total_texts
            );
        }
    } else {
        let summary = checker.validate_file(path)?;
        if as_json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("{}", "Text Integrity".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}: {}", "File".bold(), path.display());
        println!("{}: {}", "Texts".bold(), summary.total_texts);
        println!("{}: {}", "Garbled".bold(), summary.garbled_texts);
        println!("{}: {:.1}%", "Accuracy".bold(), summary.accuracy * 100.0);
        for issue in &summary.issues {
            println!("  {} {}: {}", "✗".red(), issue.field, issue.text);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = LopdfSource::open(input)?;
    let metadata = source.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), metadata.page_count);

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = metadata.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let structure = StructureExtractor::new().extract(&source);
    let [h1, h2, h3] = structure.level_counts();
    println!("{}: {}", "Title".bold(), structure.title.joined());
    println!("{}: {} / {} / {}", "H1 / H2 / H3".bold(), h1, h2, h3);
    println!("{}: {}", "Tables".bold(), structure.tables.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and section ranking tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extract_args_map_to_options() {
        let cli = Cli::try_parse_from([
            "docsift",
            "extract",
            "doc.pdf",
            "--title-policy",
            "last",
            "--table-pages",
            "3",
            "--sequential",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Extract { input, extract, .. }) => {
                assert_eq!(input, PathBuf::from("doc.pdf"));
                let options = extract.options();
                assert_eq!(options.title_policy, TitleConflictPolicy::LastWins);
                assert_eq!(options.table_scope, TableScope::FirstPages(3));
                assert!(!options.parallel);
                assert!(!options.merge_metadata_title);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_rank_arguments() {
        let cli = Cli::try_parse_from([
            "docsift",
            "rank",
            "--input",
            "in",
            "--output",
            "out",
            "--scorer",
            "term-vector",
            "--drop-unmatched",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Rank {
                report,
                scorer,
                drop_unmatched,
                cache,
                ..
            }) => {
                assert_eq!(report, "ranking.json");
                assert_eq!(ScorerKind::from(scorer), ScorerKind::TermVector);
                assert!(drop_unmatched);
                assert!(cache.is_none());
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_outline_command_writes_files() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), "not a pdf").unwrap();

        cmd_outline(input.path(), output.path(), &ExtractArgs::default()).unwrap();
        assert!(output.path().join("broken.json").is_file());

        cmd_validate(output.path(), true).unwrap();
        cmd_validate(&output.path().join("broken.json"), false).unwrap();
    }

    #[test]
    fn test_extract_unopenable_writes_empty_structure() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        let out = dir.path().join("broken.json");
        fs::write(&input, "not a pdf").unwrap();

        cmd_extract(&input, Some(&out), true, &ExtractArgs::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            r#"{"title":{},"outline":[],"tables":[]}"#
        );
    }
}
