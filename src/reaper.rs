//! Removal of folders left empty after sorting.
//!
//! Every directory below the root is visited children-first and removed if
//! it is empty. Removal failures are expected (folders that still hold files,
//! including the category folders) and only reported. Folders that cannot be
//! listed are reported separately and left alone.
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a prune pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Directories that were removed, deepest first.
    pub removed: Vec<PathBuf>,
    /// Directories that could not be removed (not empty, or no permission).
    pub retained: Vec<PathBuf>,
    /// Paths the walk could not read; nothing below them was pruned.
    pub unreadable: Vec<PathBuf>,
}

/// Removes every empty directory below `root`, bottom-up.
///
/// A directory's children are always handled before the directory itself,
/// so a chain of nested empty folders disappears in one pass. The root is
/// never removed. Symbolic links to directories are left alone.
pub fn prune(root: &Path) -> PruneReport {
    let mut report = PruneReport::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                report.unreadable.push(path);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.into_path();
        match fs::remove_dir(&path) {
            Ok(()) => report.removed.push(path),
            Err(_) => report.retained.push(path),
        }
    }

    report
}
