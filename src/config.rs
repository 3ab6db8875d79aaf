//! File filtering and exclusion configuration.
//!
//! Filter rules decide which files the scanner hands over for sorting. Files
//! that are filtered out stay exactly where they are. Rules come from a TOML
//! file passed with `--config`:
//!
//! ```toml
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db", "desktop.ini"]
//! patterns = ["*.tmp", "keep/**"]
//! extensions = ["bak", "part"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! The default configuration excludes nothing, hidden files included.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while reading or compiling filter rules.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// The file is not valid TOML, or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// A glob in `patterns` does not compile.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    /// A `regex` entry does not compile.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        pattern: String,
        reason: String,
    },
    /// The file exists but could not be read.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Filter rules for a sorting run.
///
/// Deserialized from TOML. `source` remembers which file the rules came from
/// so that file is never swept into `others/` itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,

    /// Path the configuration was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether hidden files (starting with ".") are sorted. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for leaving files where they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the root-relative path (e.g., "*.tmp", "keep/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, case-insensitive (e.g., "bak", "part").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Reads the filter rules for a run.
    ///
    /// Rules come only from an explicit `config_path`; without one the
    /// built-in defaults apply, whatever the working directory or home holds.
    ///
    /// # Errors
    ///
    /// Fails when the given file is missing, unreadable or malformed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parses one file and records its canonical path as the source.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.source = Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        Ok(config)
    }

    /// Compiles every glob and regex up front.
    ///
    /// # Errors
    ///
    /// The first pattern that does not compile is reported.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters, self.source)
    }
}

/// Filter rules with every pattern pre-compiled.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
    config_source: Option<PathBuf>,
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    fn new(rules: FilterRules, config_source: Option<PathBuf>) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
            config_source,
        })
    }

    /// Check if a file should be sorted.
    ///
    /// `absolute` is the file's location on disk, `relative` its path below
    /// the root being sorted; glob patterns are matched against `relative`.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. The loaded configuration file itself - always excluded
    /// 2. Include patterns (whitelist) - if matched, always include
    /// 3. Hidden file filter - if hidden and disabled, exclude
    /// 4. Exact filename match - if matched, exclude
    /// 5. File extension match - if matched, exclude
    /// 6. Glob pattern match - if matched, exclude
    /// 7. Regex pattern match - if matched, exclude
    /// 8. Default: include
    pub fn should_include(&self, absolute: &Path, relative: &Path) -> bool {
        if self.is_config_source(absolute) {
            return false;
        }

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_include_patterns(relative) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_exclude_patterns(relative) {
            return false;
        }

        if self.matches_exclude_regex(&file_name) {
            return false;
        }

        true
    }

    fn is_config_source(&self, absolute: &Path) -> bool {
        let Some(source) = &self.config_source else {
            return false;
        };
        fs::canonicalize(absolute)
            .map(|p| &p == source)
            .unwrap_or(false)
    }

    fn matches_include_patterns(&self, relative: &Path) -> bool {
        self.include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }

    fn matches_exclude_patterns(&self, relative: &Path) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }

    fn matches_exclude_regex(&self, file_name: &str) -> bool {
        self.exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
            config_source: None,
        }
    }
}
