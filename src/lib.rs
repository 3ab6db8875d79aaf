//! clean-folder - sort a messy folder tree by file category
//!
//! This library scans a folder recursively, classifies files by extension,
//! transliterates Ukrainian file names into ASCII, moves files into
//! per-category subfolders, unpacks archives and removes the folders left
//! empty.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod reaper;
pub mod scanner;
pub mod transliterate;

pub use archive::{ArchiveFormat, ExtractOutcome, SkipReason, extract_archive};
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_category::{Category, ExtensionTable, extension_of};
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, Relocation};
pub use reaper::{PruneReport, prune};
pub use scanner::{Discovered, FileEntry, FolderEntry, ScanReport, discover, scan};
pub use transliterate::{TranslationTable, normalize};

pub use cli::{Cli, RunReport, organize_directory, run_cli};
