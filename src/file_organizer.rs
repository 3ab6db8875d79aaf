/// Moving sorted files into their category folders.
///
/// This module owns the crate error type and the relocation step: a
/// classified file is renamed through [`normalize`] and moved into the
/// category folder directly under the root. A name collision never
/// overwrites; the file gets a numbered name instead.
use crate::config::ConfigError;
use crate::transliterate::normalize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a single relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// The original path of the file before sorting.
    pub original_path: PathBuf,
    /// The new path of the file after sorting.
    pub new_path: PathBuf,
    /// The category folder the file was moved to.
    pub category: String,
}

/// Errors that abort a sorting run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root folder is missing or is not a directory.
    #[error("Invalid root folder {}: {source}", path.display())]
    InvalidRootPath { path: PathBuf, source: io::Error },
    /// Walking the tree failed.
    #[error("Failed to scan {}: {source}", path.display())]
    ScanFailed {
        path: PathBuf,
        source: walkdir::Error,
    },
    /// Failed to create a category or archive folder.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category folder.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// An archive exists but could not be opened.
    #[error("Failed to open archive {}: {source}", path.display())]
    ArchiveOpenFailed { path: PathBuf, source: io::Error },
    /// An archive was unpacked but could not be deleted afterwards.
    #[error("Failed to remove unpacked archive {}: {source}", path.display())]
    ArchiveRemovalFailed { path: PathBuf, source: io::Error },
    /// The filter configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for sorting operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Checks that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> OrganizeResult<()> {
    let metadata = fs::metadata(root).map_err(|e| OrganizeError::InvalidRootPath {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(OrganizeError::InvalidRootPath {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "root is not a directory"),
        });
    }
    Ok(())
}

/// Creates `path` as a directory unless it already exists.
pub(crate) fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Returns a path inside `dir` named `file_name` that does not exist yet.
///
/// `photo.jpg` becomes `photo_1.jpg`, `photo_2.jpg`, ... The counter goes
/// before the first dot, matching how [`normalize`] splits names.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (base, extension) = match file_name.split_once('.') {
        Some((base, extension)) => (base, Some(extension)),
        None => (file_name, None),
    };

    (1..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{}_{}.{}", base, n, ext)),
            None => dir.join(format!("{}_{}", base, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Moves classified files into category folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves a file into `root/<category_dir_name>` under its normalized name.
    ///
    /// The category folder is created when missing. If the normalized name is
    /// already taken, a numbered variant is used instead of overwriting.
    ///
    /// # Arguments
    ///
    /// * `root` - The folder being sorted
    /// * `file_path` - The full path to the file to be moved
    /// * `category_dir_name` - The name of the category folder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clean_folder::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let moved = FileOrganizer::relocate(
    ///     Path::new("/path/to/root/нотатки.txt"),
    ///     Path::new("/path/to/root"),
    ///     "documents",
    /// );
    ///
    /// match moved {
    ///     Ok(op) => println!("Moved to {}", op.new_path.display()),
    ///     Err(e) => eprintln!("Sorting failed: {}", e),
    /// }
    /// ```
    pub fn relocate(
        file_path: &Path,
        root: &Path,
        category_dir_name: &str,
    ) -> OrganizeResult<Relocation> {
        let category_path = root.join(category_dir_name);
        ensure_dir(&category_path)?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            })?
            .to_string_lossy();

        let destination_path = unique_destination(&category_path, &normalize(&file_name));

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source: e,
        })?;

        Ok(Relocation {
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category: category_dir_name.to_string(),
        })
    }
}
