/// File categorization by extension.
///
/// This module maps a file's extension to one of a fixed set of categories
/// (images, documents, audio, video, archives) through a static lookup table.
/// Files whose extension is missing or unknown belong to [`Category::Other`].
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::{Category, ExtensionTable, extension_of};
///
/// let table = ExtensionTable::default();
/// assert_eq!(extension_of("Photo.JPG"), "JPG");
/// assert_eq!(table.classify("JPG"), Some(Category::Image));
/// assert_eq!(table.classify("XYZ"), None);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Represents a destination category.
///
/// The set is fixed; every category owns a reserved folder directly under
/// the root being sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (JPEG, PNG, JPG, SVG)
    Image,
    /// Document files (TXT, DOC, DOCX, PDF, XLSX, PPTX)
    Document,
    /// Audio files (MP3, OGG, WAV, AMR)
    Audio,
    /// Video files (AVI, MP4, MOV, MKV)
    Video,
    /// Archive files (ZIP, GZ, TAR)
    Archive,
    /// Unknown or extension-less files
    Other,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Document,
        Category::Audio,
        Category::Video,
        Category::Archive,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Archive.dir_name(), "archives");
    /// assert_eq!(Category::Other.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archive => "archives",
            Category::Other => "others",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Image files",
            Category::Document => "Document files",
            Category::Audio => "Audio files",
            Category::Video => "Video files",
            Category::Archive => "Archive files",
            Category::Other => "Other files",
        }
    }

    /// Looks up the category owning a reserved folder name.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    /// Returns true if `name` is a reserved category folder name.
    ///
    /// Reserved folders hold already-sorted files and are never descended into
    /// while scanning.
    pub fn is_reserved_dir(name: &str) -> bool {
        Self::from_dir_name(name).is_some()
    }
}

/// Immutable mapping from uppercase extension (without dot) to category.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    extension_map: HashMap<&'static str, Category>,
}

impl ExtensionTable {
    /// Creates the table with all registered extensions.
    pub fn new() -> Self {
        let mut table = Self {
            extension_map: HashMap::new(),
        };
        table.populate();
        table
    }

    fn populate(&mut self) {
        for ext in ["JPEG", "PNG", "JPG", "SVG"] {
            self.add(ext, Category::Image);
        }
        for ext in ["AVI", "MP4", "MOV", "MKV"] {
            self.add(ext, Category::Video);
        }
        for ext in ["TXT", "DOC", "DOCX", "PDF", "XLSX", "PPTX"] {
            self.add(ext, Category::Document);
        }
        for ext in ["ZIP", "GZ", "TAR"] {
            self.add(ext, Category::Archive);
        }
        for ext in ["MP3", "OGG", "WAV", "AMR"] {
            self.add(ext, Category::Audio);
        }
    }

    fn add(&mut self, ext: &'static str, category: Category) {
        let previous = self.extension_map.insert(ext, category);
        debug_assert!(previous.is_none(), "extension {ext} registered twice");
    }

    /// Maps an uppercase extension to its category, `None` on a miss.
    ///
    /// Callers pass the output of [`extension_of`], which is already uppercased.
    pub fn classify(&self, extension: &str) -> Option<Category> {
        self.extension_map.get(extension).copied()
    }

    /// Returns every registered extension, sorted.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<_> = self.extension_map.keys().copied().collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the file name's last suffix, uppercased, without the leading dot.
///
/// Returns an empty string when the name has no suffix (`"noext"`,
/// `".bashrc"`, `"trailing."`).
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
