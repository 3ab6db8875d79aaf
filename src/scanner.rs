//! Recursive discovery and classification of the files under a root folder.
//!
//! Traversal and classification are separate steps: [`discover`] lazily walks
//! the tree, skipping reserved category folders, and [`scan`] drains that walk
//! into a fresh [`ScanReport`].

use crate::config::CompiledFilters;
use crate::file_category::{Category, ExtensionTable, extension_of};
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file found during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Original file name.
    pub name: String,
    /// Uppercased extension, empty when the name has none.
    pub extension: String,
}

impl FileEntry {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&name);
        Self {
            path,
            name,
            extension,
        }
    }
}

/// A plain (non-reserved) subfolder found during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub path: PathBuf,
}

/// One item yielded by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    Folder(FolderEntry),
    File(FileEntry),
}

/// Everything one scan found, grouped by category.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Files to sort, per category, in discovery order.
    pub files: BTreeMap<Category, Vec<FileEntry>>,
    /// Plain subfolders that were descended into.
    pub folders: Vec<FolderEntry>,
    /// Registered extensions that were seen.
    pub known_extensions: BTreeSet<String>,
    /// Extensions that have no category. Reporting only.
    pub unknown_extensions: BTreeSet<String>,
    /// Files left in place by the filter rules.
    pub excluded: Vec<PathBuf>,
}

impl ScanReport {
    /// Files found for `category`.
    pub fn files_in(&self, category: Category) -> &[FileEntry] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of files to sort.
    pub fn total_files(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    fn push(&mut self, category: Category, entry: FileEntry) {
        self.files.entry(category).or_default().push(entry);
    }
}

fn is_reserved(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && Category::is_reserved_dir(&entry.file_name().to_string_lossy())
}

/// Lazily walks `root` depth-first.
///
/// Reserved category folders are skipped at every depth, together with
/// everything inside them. Symbolic links are not followed; a link is
/// reported as a file. Entry order is whatever the file system returns.
pub fn discover(root: &Path) -> impl Iterator<Item = OrganizeResult<Discovered>> {
    let root_path = root.to_path_buf();
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_reserved(entry))
        .map(move |entry| {
            let entry = entry.map_err(|e| OrganizeError::ScanFailed {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root_path.clone()),
                source: e,
            })?;
            let is_dir = entry.file_type().is_dir();
            let path = entry.into_path();
            Ok(if is_dir {
                Discovered::Folder(FolderEntry { path })
            } else {
                Discovered::File(FileEntry::new(path))
            })
        })
}

/// Scans `root` and classifies every file found.
///
/// Files without an extension go to [`Category::Other`]. Files with an
/// unregistered extension also go there, and their extension is recorded in
/// [`ScanReport::unknown_extensions`].
///
/// # Errors
///
/// Any error while reading the tree aborts the scan.
pub fn scan(
    root: &Path,
    table: &ExtensionTable,
    filters: &CompiledFilters,
) -> OrganizeResult<ScanReport> {
    let mut report = ScanReport::default();

    for item in discover(root) {
        match item? {
            Discovered::Folder(folder) => report.folders.push(folder),
            Discovered::File(file) => {
                let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
                if !filters.should_include(&file.path, relative) {
                    report.excluded.push(file.path);
                    continue;
                }

                if file.extension.is_empty() {
                    report.push(Category::Other, file);
                    continue;
                }

                match table.classify(&file.extension) {
                    Some(category) => {
                        report.known_extensions.insert(file.extension.clone());
                        report.push(category, file);
                    }
                    None => {
                        report.unknown_extensions.insert(file.extension.clone());
                        report.push(Category::Other, file);
                    }
                }
            }
        }
    }

    Ok(report)
}
