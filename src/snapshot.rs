//! Pre-organization structure snapshots.
//!
//! Before a real run mutates anything, the engine can record the source
//! tree as a Markdown listing under the tool's log folder, so users keep a
//! human-readable record of what the directory looked like. Recording is a
//! fire-and-forget side effect: a failure is reported to the caller and the
//! organization continues.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ignore::{LOG_FOLDER_NAME, is_reserved_name};

/// Error raised when a snapshot cannot be recorded.
#[derive(Debug)]
pub struct SnapshotError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to record structure snapshot at {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for SnapshotError {}

/// Capability that records the pre-organization tree somewhere and returns
/// the storage location.
pub trait StructureSnapshotter {
    /// Record the tree under `source`. The snapshot is stored relative to
    /// `output` when given, otherwise relative to `source`.
    fn record(&self, source: &Path, output: Option<&Path>) -> Result<PathBuf, SnapshotError>;
}

/// Writes `original_structure_<timestamp>.md` into the log folder.
pub struct MarkdownSnapshotter;

impl StructureSnapshotter for MarkdownSnapshotter {
    fn record(&self, source: &Path, output: Option<&Path>) -> Result<PathBuf, SnapshotError> {
        let now = Local::now();
        let mut content = format!(
            "# Original directory structure: {} - {}\n\n",
            source.display(),
            now.format("%Y-%m-%d %H:%M:%S")
        );
        scan_to_markdown(source, 0, &mut content).map_err(|e| SnapshotError {
            path: source.to_path_buf(),
            source: e,
        })?;

        let log_dir = output.unwrap_or(source).join(LOG_FOLDER_NAME);
        fs::create_dir_all(&log_dir).map_err(|e| SnapshotError {
            path: log_dir.clone(),
            source: e,
        })?;

        let file_name = format!("original_structure_{}.md", now.format("%Y%m%d_%H%M%S"));
        let log_path = log_dir.join(file_name);
        fs::write(&log_path, content).map_err(|e| SnapshotError {
            path: log_path.clone(),
            source: e,
        })?;
        Ok(log_path)
    }
}

/// Snapshotter that records nothing and reports an empty location.
pub struct NullSnapshotter;

impl StructureSnapshotter for NullSnapshotter {
    fn record(&self, _source: &Path, _output: Option<&Path>) -> Result<PathBuf, SnapshotError> {
        Ok(PathBuf::new())
    }
}

/// Append one directory level as a Markdown list, recursing into
/// subdirectories. Reserved entries are left out. An unreadable child is
/// annotated in place; only an unreadable `dir` itself is an error.
fn scan_to_markdown(dir: &Path, indent: usize, out: &mut String) -> std::io::Result<()> {
    let prefix = format!("{}- ", "  ".repeat(indent));

    let mut names: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .filter(|(name, _)| !is_reserved_name(name))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, path) in names {
        if path.is_dir() {
            out.push_str(&format!("{}{}/\n", prefix, name));
            if scan_to_markdown(&path, indent + 1, out).is_err() {
                out.push_str(&format!("{}  (unreadable)\n", "  ".repeat(indent + 1)));
            }
        } else {
            out.push_str(&format!("{}{}\n", prefix, name));
        }
    }
    Ok(())
}
