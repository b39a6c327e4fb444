//! Reserved-name filtering for traversal and cleanup.
//!
//! Certain entries must never be classified, moved, or recursed into:
//! OS metadata files, version-control directories, dependency and build
//! caches, and this tool's own log folder. The reserved set is fixed and
//! compared case-insensitively. On top of it, users can exclude additional
//! entries through the settings file (exact filenames, glob patterns,
//! extensions, or regexes).

use glob::Pattern;
use regex::Regex;
use std::collections::HashSet;

use crate::config::{ConfigError, ExtraIgnoreRules};
use crate::plan::PLAN_FILE_NAME;

/// Name of the folder this tool writes structure snapshots into.
/// It is part of the reserved set so the engine never organizes its own logs.
pub const LOG_FOLDER_NAME: &str = ".filesift-logs";

/// Entries that are never classified or traversed, compared lower-cased.
const RESERVED_NAMES: &[&str] = &[
    // OS metadata
    ".ds_store",
    "thumbs.db",
    "desktop.ini",
    // this tool's own output
    LOG_FOLDER_NAME,
    PLAN_FILE_NAME,
    // version control
    ".git",
    ".gitignore",
    ".svn",
    ".hg",
    // dependency management
    "node_modules",
    // editor / IDE state
    ".vscode",
    ".idea",
    // language tooling caches
    "__pycache__",
    ".pytest_cache",
    ".coverage",
    ".nyc_output",
    "coverage",
    // temp and cache folders
    ".tmp",
    ".temp",
    ".cache",
    ".sass-cache",
    ".parcel-cache",
    // build output
    "dist",
    "build",
    ".next",
    ".nuxt",
    ".output",
    // deployment state
    ".vercel",
    ".netlify",
];

/// Returns true when `name` belongs to the fixed reserved set.
///
/// Pure and case-insensitive; this is the check applied to every entry
/// before it is classified or recursed into, and again during cleanup when
/// deciding whether a directory counts as empty.
pub fn is_reserved_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_NAMES.contains(&lower.as_str())
}

/// Combined filter: the fixed reserved set plus compiled user excludes.
pub struct IgnoreFilter {
    extra_filenames: HashSet<String>,
    extra_extensions: HashSet<String>,
    extra_patterns: Vec<Pattern>,
    extra_regexes: Vec<Regex>,
}

impl IgnoreFilter {
    /// Filter with the reserved set only.
    pub fn new() -> Self {
        Self {
            extra_filenames: HashSet::new(),
            extra_extensions: HashSet::new(),
            extra_patterns: Vec::new(),
            extra_regexes: Vec::new(),
        }
    }

    /// Compile user-provided exclude rules on top of the reserved set.
    ///
    /// Patterns are validated here, once, so matching never reparses.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn with_extra_rules(rules: &ExtraIgnoreRules) -> Result<Self, ConfigError> {
        let extra_patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let extra_regexes = rules
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
            extra_filenames: rules.filenames.iter().map(|n| n.to_lowercase()).collect(),
            extra_extensions: rules.extensions.iter().map(|e| e.to_lowercase()).collect(),
            extra_patterns,
            extra_regexes,
        })
    }

    /// Whether an entry with this name must be skipped entirely.
    pub fn should_ignore(&self, name: &str) -> bool {
        if is_reserved_name(name) {
            return true;
        }

        let lower = name.to_lowercase();
        if self.extra_filenames.contains(&lower) {
            return true;
        }

        if let Some((_, ext)) = lower.rsplit_once('.')
            && self.extra_extensions.contains(ext)
        {
            return true;
        }

        if self.extra_patterns.iter().any(|p| p.matches(name)) {
            return true;
        }

        self.extra_regexes.iter().any(|r| r.is_match(name))
    }
}

impl Default for IgnoreFilter {
    fn default() -> Self {
        Self::new()
    }
}
