//! Collision-safe path resolution and file moves.
//!
//! This module provides the two filesystem primitives of an organization
//! pass: resolving a destination path that will not overwrite an existing
//! file, and performing (or, in dry-run mode, skipping) the actual move.
//! Directory creation failures and move failures carry their underlying
//! `io::Error` so callers can log precise per-file diagnostics.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category or output directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its resolved target.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The source directory path is invalid or doesn't exist.
    InvalidSourcePath { path: PathBuf },
    /// The operation is missing a required credential.
    MissingCredential,
    /// The source tree could not be read at its root.
    TraversalFailed { path: PathBuf, reason: String },
    /// The category suggestion request failed or returned an unusable payload.
    SuggestionFailed { reason: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidSourcePath { path } => {
                write!(
                    f,
                    "Source directory does not exist or is not a directory: {}",
                    path.display()
                )
            }
            Self::MissingCredential => {
                write!(f, "No API key configured for the classification service")
            }
            Self::TraversalFailed { path, reason } => {
                write!(f, "Failed to read directory {}: {}", path.display(), reason)
            }
            Self::SuggestionFailed { reason } => {
                write!(f, "Failed to get category suggestions: {}", reason)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened (or would happen) to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Real run: the file was renamed to its target.
    Moved,
    /// Real run: target equals source, nothing to do.
    AlreadyInPlace,
    /// Dry run: the move was recorded but not performed.
    Planned,
}

/// Resolve a collision-free target path for `file_name` inside `target_dir`.
///
/// Starts at `target_dir/file_name` and, while a filesystem entry already
/// occupies the candidate AND the candidate is not `source_path` itself,
/// appends `_1`, `_2`, … to the filename stem before the extension.
///
/// The returned path either does not exist yet, or is exactly the source
/// path (the no-op move case). The second value reports whether a suffix was
/// applied. No cross-process guarantee: single-process, single-pass use only.
pub fn resolve_target(target_dir: &Path, file_name: &str, source_path: &Path) -> (PathBuf, bool) {
    let base = Path::new(file_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()));

    let mut candidate = target_dir.join(file_name);
    let mut counter: u32 = 1;
    let mut renamed = false;

    while candidate.exists() && candidate != source_path {
        let next_name = match &ext {
            Some(ext) => format!("{}_{}{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        candidate = target_dir.join(next_name);
        counter += 1;
        renamed = true;
    }

    (candidate, renamed)
}

/// Create `path` (and any missing parents) unless it already exists.
///
/// Returns whether the directory was created.
///
/// # Errors
///
/// Returns `OrganizeError::DirectoryCreationFailed` on failure; callers
/// treat this as fatal for the pass, since subsequent moves would have
/// nowhere valid to land.
pub fn create_dir_if_missing(path: &Path) -> OrganizeResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Move `source` to `target`, or only record the plan in dry-run mode.
///
/// # Errors
///
/// Returns `OrganizeError::FileMoveFailure` when the rename fails; callers
/// log it and continue with the rest of the batch.
pub fn move_file(source: &Path, target: &Path, dry_run: bool) -> OrganizeResult<MoveOutcome> {
    if dry_run {
        return Ok(MoveOutcome::Planned);
    }
    if source == target {
        return Ok(MoveOutcome::AlreadyInPlace);
    }
    fs::rename(source, target).map_err(|e| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: target.to_path_buf(),
        source_error: e,
    })?;
    Ok(MoveOutcome::Moved)
}
