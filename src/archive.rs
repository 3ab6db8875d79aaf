//! Unpacking archives into `archives/<name>/`.
//!
//! Each archive gets its own folder named after its normalized stem. A
//! successful unpack deletes the original archive. A failed unpack is not an
//! error: the destination folder is cleaned up, the archive stays where it
//! was, and the reason is reported as [`ExtractOutcome::Skipped`].

use crate::file_organizer::{OrganizeError, OrganizeResult, ensure_dir};
use crate::transliterate::normalize;
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Archive formats that can be unpacked, picked by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Guesses the format from the file name, case-insensitively.
    ///
    /// A bare `.gz` that is not a tarball has no format.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::archive::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_file_name("a.ZIP"), Some(ArchiveFormat::Zip));
    /// assert_eq!(ArchiveFormat::from_file_name("a.tar.gz"), Some(ArchiveFormat::TarGz));
    /// assert_eq!(ArchiveFormat::from_file_name("a.gz"), None);
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar") {
            Some(Self::Tar)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    fn unpack(self, archive: File, destination: &Path) -> Result<(), String> {
        match self {
            Self::Zip => {
                let mut zip = zip::ZipArchive::new(BufReader::new(archive))
                    .map_err(|e| e.to_string())?;
                zip.extract(destination).map_err(|e| e.to_string())
            }
            Self::Tar => tar::Archive::new(BufReader::new(archive))
                .unpack(destination)
                .map_err(|e| e.to_string()),
            Self::TarGz => tar::Archive::new(GzDecoder::new(BufReader::new(archive)))
                .unpack(destination)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Why an archive was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No unpacker handles this file name.
    UnsupportedFormat,
    /// The archive file vanished before it could be read.
    SourceMissing,
    /// The unpacker could not read the archive.
    InvalidArchive(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => write!(f, "unsupported archive format"),
            Self::SourceMissing => write!(f, "archive file not found"),
            Self::InvalidArchive(reason) => write!(f, "unreadable archive: {}", reason),
        }
    }
}

/// Result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Contents were unpacked into `destination` and the archive was deleted.
    Extracted { archive: PathBuf, destination: PathBuf },
    /// Nothing was unpacked; the archive is untouched.
    Skipped { archive: PathBuf, reason: SkipReason },
}

impl ExtractOutcome {
    /// The archive this outcome is about.
    pub fn archive(&self) -> &Path {
        match self {
            Self::Extracted { archive, .. } | Self::Skipped { archive, .. } => archive,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// Folder name for an archive: its file stem, normalized.
///
/// `Фото.zip` becomes `Foto`, `backup.tar.gz` becomes `backup.tar`. A stem
/// that would not name a folder of its own (empty, `.` or `..`) becomes `_`.
pub fn destination_name(archive_name: &str) -> String {
    let stem = Path::new(archive_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive_name.to_string());
    match normalize(&stem).as_str() {
        "" | "." | ".." => "_".to_string(),
        name => name.to_string(),
    }
}

/// Unpacks `archive_path` into `root/<category_dir_name>/<normalized stem>/`.
///
/// # Errors
///
/// Failing to create the category folder or the destination folder, to open
/// an archive that exists, or to delete the archive after a successful unpack
/// is an error. Every failure of the unpacker itself is returned as
/// [`ExtractOutcome::Skipped`], since the format readers report corrupt data
/// and I/O trouble through the same error type.
pub fn extract_archive(
    archive_path: &Path,
    root: &Path,
    category_dir_name: &str,
) -> OrganizeResult<ExtractOutcome> {
    let category_path = root.join(category_dir_name);
    ensure_dir(&category_path)?;

    let archive_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let destination = category_path.join(destination_name(&archive_name));
    let created = !destination.exists();
    ensure_dir(&destination)?;

    let skipped = |reason: SkipReason| -> OrganizeResult<ExtractOutcome> {
        discard_destination(&destination, created);
        Ok(ExtractOutcome::Skipped {
            archive: archive_path.to_path_buf(),
            reason,
        })
    };

    let Some(format) = ArchiveFormat::from_file_name(&archive_name) else {
        return skipped(SkipReason::UnsupportedFormat);
    };

    let file = match File::open(archive_path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return skipped(SkipReason::SourceMissing);
        }
        Err(e) => {
            discard_destination(&destination, created);
            return Err(OrganizeError::ArchiveOpenFailed {
                path: archive_path.to_path_buf(),
                source: e,
            });
        }
    };

    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        return skipped(SkipReason::InvalidArchive("empty file".to_string()));
    }

    if let Err(reason) = format.unpack(file, &destination) {
        return skipped(SkipReason::InvalidArchive(reason));
    }

    match fs::remove_file(archive_path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(OrganizeError::ArchiveRemovalFailed {
                path: archive_path.to_path_buf(),
                source: e,
            });
        }
    }

    Ok(ExtractOutcome::Extracted {
        archive: archive_path.to_path_buf(),
        destination,
    })
}

/// Removes a destination folder after a failed unpack.
///
/// A folder created by this attempt goes away with any partial contents; a
/// folder that already existed is only removed if it is empty.
fn discard_destination(destination: &Path, created: bool) {
    let _ = if created {
        fs::remove_dir_all(destination)
    } else {
        fs::remove_dir(destination)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create zip");
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).expect("Failed to start entry");
            zip.write_all(content.as_bytes()).expect("Failed to write entry");
        }
        zip.finish().expect("Failed to finish zip");
    }

    fn append_tar_entries<W: Write>(builder: &mut tar::Builder<W>, entries: &[(&str, &str)]) {
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .expect("Failed to append entry");
        }
    }

    fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create tar.gz");
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_tar_entries(&mut builder, entries);
        builder
            .into_inner()
            .expect("Failed to finish tar")
            .finish()
            .expect("Failed to finish gzip");
    }

    #[test]
    fn test_destination_name() {
        assert_eq!(destination_name("foo.zip"), "foo");
        assert_eq!(destination_name("Фото 2024.zip"), "Foto_2024");
        assert_eq!(destination_name("backup.tar.gz"), "backup.tar");
    }

    #[test]
    fn test_destination_name_stays_inside_category() {
        assert_eq!(destination_name("...zip"), "_");
        assert_eq!(destination_name("..zip"), "_");
        assert_eq!(destination_name(".zip"), ".zip");
    }

    #[test]
    fn test_dot_named_archive_does_not_spill_into_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        let archive = root.join("sub").join("...zip");
        write_zip(&archive, &[("spill.txt", "contents")]);

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(outcome.is_extracted());
        assert!(!root.join("spill.txt").exists());
        assert_eq!(
            fs::read_to_string(root.join("archives").join("_").join("spill.txt")).unwrap(),
            "contents"
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ArchiveFormat::from_file_name("x.zip"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_file_name("x.TAR"), Some(ArchiveFormat::Tar));
        assert_eq!(ArchiveFormat::from_file_name("x.Tar.Gz"), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::from_file_name("x.tgz"), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::from_file_name("x.gz"), None);
        assert_eq!(ArchiveFormat::from_file_name("x.rar"), None);
    }

    #[test]
    fn test_extract_zip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("Архів.zip");
        write_zip(&archive, &[("readme.txt", "hello"), ("nested/data.csv", "1,2")]);

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        let destination = root.join("archives").join("Arhiv");
        assert_eq!(
            outcome,
            ExtractOutcome::Extracted {
                archive: archive.clone(),
                destination: destination.clone(),
            }
        );
        assert!(!archive.exists());
        assert_eq!(fs::read_to_string(destination.join("readme.txt")).unwrap(), "hello");
        assert_eq!(
            fs::read_to_string(destination.join("nested").join("data.csv")).unwrap(),
            "1,2"
        );
    }

    #[test]
    fn test_extract_tar() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("bundle.tar");
        let mut builder = tar::Builder::new(File::create(&archive).unwrap());
        append_tar_entries(&mut builder, &[("a.txt", "alpha")]);
        builder.finish().expect("Failed to finish tar");
        drop(builder);

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(outcome.is_extracted());
        assert!(!archive.exists());
        assert_eq!(
            fs::read_to_string(root.join("archives").join("bundle").join("a.txt")).unwrap(),
            "alpha"
        );
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("logs.tar.gz");
        write_tar_gz(&archive, &[("day1.log", "ok")]);

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(outcome.is_extracted());
        assert_eq!(
            fs::read_to_string(root.join("archives").join("logs.tar").join("day1.log")).unwrap(),
            "ok"
        );
    }

    #[test]
    fn test_corrupt_archive_is_left_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("broken.zip");
        fs::write(&archive, "this is not a zip file").unwrap();

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(matches!(
            outcome,
            ExtractOutcome::Skipped {
                reason: SkipReason::InvalidArchive(_),
                ..
            }
        ));
        assert!(archive.exists());
        assert!(!root.join("archives").join("broken").exists());
    }

    #[test]
    fn test_plain_gz_is_unsupported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("dump.gz");
        let mut encoder = GzEncoder::new(File::create(&archive).unwrap(), Compression::default());
        encoder.write_all(b"raw").unwrap();
        encoder.finish().unwrap();

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert_eq!(
            outcome,
            ExtractOutcome::Skipped {
                archive: archive.clone(),
                reason: SkipReason::UnsupportedFormat,
            }
        );
        assert!(archive.exists());
        assert!(!root.join("archives").join("dump").exists());
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("gone.zip");

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert_eq!(
            outcome,
            ExtractOutcome::Skipped {
                archive,
                reason: SkipReason::SourceMissing,
            }
        );
        assert!(!root.join("archives").join("gone").exists());
    }

    #[test]
    fn test_unopenable_archive_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("plain"), "not a folder").unwrap();
        let archive = root.join("plain").join("inside.zip");

        let result = extract_archive(&archive, root, "archives");

        assert!(matches!(result, Err(OrganizeError::ArchiveOpenFailed { .. })));
        assert!(!root.join("archives").join("inside").exists());
    }

    #[test]
    fn test_empty_archive_file_is_invalid() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let archive = root.join("empty.tar");
        fs::write(&archive, "").unwrap();

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(!outcome.is_extracted());
        assert!(archive.exists());
    }

    #[test]
    fn test_failure_keeps_existing_destination_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let existing = root.join("archives").join("photos");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("earlier.jpg"), "jpg").unwrap();

        let archive = root.join("photos.zip");
        fs::write(&archive, "garbage").unwrap();

        let outcome = extract_archive(&archive, root, "archives").expect("Extraction failed");

        assert!(!outcome.is_extracted());
        assert!(existing.join("earlier.jpg").exists());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::UnsupportedFormat.to_string(), "unsupported archive format");
        assert_eq!(SkipReason::SourceMissing.to_string(), "archive file not found");
        assert_eq!(
            SkipReason::InvalidArchive("bad header".to_string()).to_string(),
            "unreadable archive: bad header"
        );
    }
}
