//! Command-line interface module for clean-folder.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Filter configuration loading
//! - Running the sort pipeline (scan, relocate, extract, prune)
//! - Dry-run planning and the final report

use crate::archive::{self, ExtractOutcome};
use crate::config::{CompiledFilters, FilterConfig};
use crate::file_category::{Category, ExtensionTable};
use crate::file_organizer::{FileOrganizer, OrganizeResult, Relocation, validate_root};
use crate::output::OutputFormatter;
use crate::reaper::{self, PruneReport};
use crate::scanner::{self, ScanReport};
use crate::transliterate::normalize;
use clap::Parser;
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Sort a folder into images, documents, audio, video, archives and others.
#[derive(Parser, Debug)]
#[command(name = "clean-folder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sort a folder tree into category subfolders")]
#[command(
    long_about = "Recursively sorts ROOT: files are moved into images/, documents/, audio/, \
                  video/ and others/ under transliterated names, archives are unpacked into \
                  archives/<name>/, and folders left empty are removed."
)]
pub struct Cli {
    /// Folder to sort
    pub root: PathBuf,

    /// Show what would be done without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a TOML filter configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Everything a sorting run did.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files moved into category folders.
    pub relocations: Vec<Relocation>,
    /// One outcome per archive.
    pub extractions: Vec<ExtractOutcome>,
    /// Empty folders removed at the end.
    pub pruned: PruneReport,
    /// Registered extensions that were seen.
    pub known_extensions: BTreeSet<String>,
    /// Extensions without a category.
    pub unknown_extensions: BTreeSet<String>,
    /// Files left in place by the filter rules.
    pub excluded: Vec<PathBuf>,
}

impl RunReport {
    /// Number of files that ended up in `category`'s folder.
    pub fn count_in(&self, category: Category) -> usize {
        if category == Category::Archive {
            return self.extractions.iter().filter(|o| o.is_extracted()).count();
        }
        self.relocations
            .iter()
            .filter(|op| op.category == category.dir_name())
            .count()
    }

    /// Archives that were left in place.
    pub fn skipped_archives(&self) -> impl Iterator<Item = &ExtractOutcome> {
        self.extractions.iter().filter(|o| !o.is_extracted())
    }
}

/// Runs the CLI application for parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use clean_folder::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["clean-folder", "/path/to/folder"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> OrganizeResult<()> {
    OutputFormatter::info(&format!("Start in {}", cli.root.display()));

    if cli.dry_run {
        organize_directory_dry_run_with_config(&cli.root, cli.config.as_deref()).map(|_| ())
    } else {
        let report = organize_directory_with_config(&cli.root, cli.config.as_deref())?;
        print_run_report(&report);
        Ok(())
    }
}

/// Sorts `root`, loading filters from `config_path` or the default locations.
///
/// A progress bar is drawn while files are moved.
pub fn organize_directory_with_config(
    root: &Path,
    config_path: Option<&Path>,
) -> OrganizeResult<RunReport> {
    let filters = FilterConfig::load(config_path)?.compile()?;
    let progress = OutputFormatter::create_progress_bar(0);
    let report = organize_directory(root, &filters, &progress);
    progress.finish_and_clear();
    report
}

/// Runs the whole pipeline on `root`.
///
/// 1. Scan the tree and classify every file
/// 2. Move every non-archive file into its category folder
/// 3. Unpack every archive into `archives/<name>/`
/// 4. Remove folders left empty
///
/// The first file system error aborts the run; files already moved stay moved.
pub fn organize_directory(
    root: &Path,
    filters: &CompiledFilters,
    progress: &ProgressBar,
) -> OrganizeResult<RunReport> {
    validate_root(root)?;

    let table = ExtensionTable::default();
    let mut scan = scanner::scan(root, &table, filters)?;
    progress.set_length(scan.total_files() as u64);

    let mut report = RunReport {
        known_extensions: std::mem::take(&mut scan.known_extensions),
        unknown_extensions: std::mem::take(&mut scan.unknown_extensions),
        excluded: std::mem::take(&mut scan.excluded),
        ..Default::default()
    };

    for category in Category::ALL {
        if category == Category::Archive {
            continue;
        }
        for file in scan.files_in(category) {
            progress.set_message(file.name.clone());
            let op = FileOrganizer::relocate(&file.path, root, category.dir_name())?;
            report.relocations.push(op);
            progress.inc(1);
        }
    }

    for file in scan.files_in(Category::Archive) {
        progress.set_message(file.name.clone());
        let outcome = archive::extract_archive(&file.path, root, Category::Archive.dir_name())?;
        report.extractions.push(outcome);
        progress.inc(1);
    }

    report.pruned = reaper::prune(root);

    Ok(report)
}

/// Scans `root` and prints what a real run would do, without changing anything.
pub fn organize_directory_dry_run_with_config(
    root: &Path,
    config_path: Option<&Path>,
) -> OrganizeResult<ScanReport> {
    validate_root(root)?;
    let filters = FilterConfig::load(config_path)?.compile()?;
    let scan = scanner::scan(root, &ExtensionTable::default(), &filters)?;

    if scan.total_files() == 0 {
        OutputFormatter::dry_run_notice("No files found to sort.");
        return Ok(scan);
    }

    OutputFormatter::dry_run_notice("Files would be sorted as follows:");
    for category in Category::ALL {
        let files = scan.files_in(category);
        if files.is_empty() {
            continue;
        }
        OutputFormatter::header(category.description());
        for file in files {
            let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
            let target = match category {
                Category::Archive => format!(
                    "{}/{}/",
                    category.dir_name(),
                    archive::destination_name(&file.name)
                ),
                _ => format!("{}/{}", category.dir_name(), normalize(&file.name)),
            };
            OutputFormatter::plain(&format!(" - {}", relative.display()));
            OutputFormatter::plain(&format!("   → Would move to {}", target));
        }
    }

    let rows: Vec<(&str, usize)> = Category::ALL
        .iter()
        .map(|c| (c.dir_name(), scan.files_in(*c).len()))
        .filter(|(_, count)| *count > 0)
        .collect();
    OutputFormatter::summary_table(&rows);
    print_extensions(&scan.known_extensions, &scan.unknown_extensions);

    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(scan)
}

fn print_extensions(known: &BTreeSet<String>, unknown: &BTreeSet<String>) {
    if !known.is_empty() {
        OutputFormatter::plain(&format!(
            "\nKnown extensions: {}",
            known.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    if !unknown.is_empty() {
        OutputFormatter::warning(&format!(
            "Unknown extensions: {}",
            unknown.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
}

/// Prints the outcome of a real run.
pub fn print_run_report(report: &RunReport) {
    let rows: Vec<(&str, usize)> = Category::ALL
        .iter()
        .map(|c| (c.dir_name(), report.count_in(*c)))
        .filter(|(_, count)| *count > 0)
        .collect();
    OutputFormatter::summary_table(&rows);
    print_extensions(&report.known_extensions, &report.unknown_extensions);

    let skipped: Vec<String> = report
        .skipped_archives()
        .map(|outcome| match outcome {
            ExtractOutcome::Skipped { archive, reason } => {
                format!("{}: {}", archive.display(), reason)
            }
            ExtractOutcome::Extracted { archive, .. } => archive.display().to_string(),
        })
        .collect();
    OutputFormatter::list("Archives left in place", &skipped);

    let excluded: Vec<String> = report
        .excluded
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    OutputFormatter::list("Excluded by filters", &excluded);

    let unreadable: Vec<String> = report
        .pruned
        .unreadable
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    OutputFormatter::list("Folders that could not be read", &unreadable);

    if !report.pruned.removed.is_empty() {
        OutputFormatter::plain(&format!(
            "\nRemoved {} empty folder(s).",
            report.pruned.removed.len()
        ));
    }

    OutputFormatter::success("Sorting complete!");
}
