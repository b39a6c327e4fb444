//! Dry-run classification cache.
//!
//! A dry run pays one remote call per file; the matching real run should pay
//! none. The cache stores per-file decisions keyed by the request
//! fingerprint that produced them. Reuse is decided by value equality of the
//! whole fingerprint and nothing else.
//!
//! The asymmetry is deliberate: only dry runs write. A real run either
//! replays a matching cache (classifying lookup misses fresh without adding
//! them) or, on any fingerprint difference, clears the stale contents and
//! classifies everything fresh.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identity of an organization request for cache-matching purposes.
///
/// Two fingerprints are equal iff every field compares equal. Construction
/// canonicalizes the loose parts (category order, path form) so equality is
/// by value, never by incidental field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFingerprint {
    source: PathBuf,
    output: Option<PathBuf>,
    categories: Vec<String>,
    unclassified_folder: String,
    recursive: bool,
    credential: String,
}

impl RequestFingerprint {
    pub fn new(
        source: &Path,
        output: Option<&Path>,
        categories: &[String],
        unclassified_folder: &str,
        recursive: bool,
        credential: &str,
    ) -> Self {
        let mut categories: Vec<String> = categories.to_vec();
        categories.sort();
        Self {
            source: normalize_path(source),
            output: output.map(normalize_path),
            categories,
            unclassified_folder: unclassified_folder.to_string(),
            recursive,
            credential: credential.to_string(),
        }
    }
}

/// Absolute form when resolvable, the given path otherwise. Good enough for
/// equality between two requests issued from the same process.
fn normalize_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Result of a cache lookup. The cached value itself is `None` for files a
/// dry run left unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Option<String>),
    Miss,
}

/// Per-file decisions from the most recent dry run, bound to exactly one
/// fingerprint at a time.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    fingerprint: Option<RequestFingerprint>,
    decisions: HashMap<PathBuf, Option<String>>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind to a new fingerprint, discarding all prior contents.
    pub fn bind(&mut self, fingerprint: RequestFingerprint) {
        self.decisions.clear();
        self.fingerprint = Some(fingerprint);
    }

    /// Whether the cache is currently bound to this exact fingerprint.
    pub fn matches(&self, fingerprint: &RequestFingerprint) -> bool {
        self.fingerprint.as_ref() == Some(fingerprint)
    }

    /// Record one file's decision. Meaningful only while bound.
    pub fn put(&mut self, path: PathBuf, category: Option<String>) {
        self.decisions.insert(path, category);
    }

    /// Look up one file's decision.
    pub fn get(&self, path: &Path) -> CacheLookup {
        match self.decisions.get(path) {
            Some(category) => CacheLookup::Hit(category.clone()),
            None => CacheLookup::Miss,
        }
    }

    /// Drop the binding and all contents.
    pub fn clear(&mut self) {
        self.fingerprint = None;
        self.decisions.clear();
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}
