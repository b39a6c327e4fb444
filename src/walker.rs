//! Directory traversal.
//!
//! [`TreeWalker`] produces a lazy, depth-first stream of entries under a
//! root. Each call to [`TreeWalker::new`] starts a fresh traversal; the
//! stream is bounded by the tree size at call time and the underlying
//! filesystem is never assumed stable afterwards.
//!
//! Skip rules, applied to every entry before it is yielded:
//! - entries flagged by the ignore filter;
//! - the configured output directory, when it is nested inside the source
//!   root (otherwise the engine would organize its own output and recurse
//!   forever);
//! - in non-recursive mode, whole subtrees.
//!
//! An unreadable subdirectory is reported to the progress sink and only that
//! subtree is skipped. An unreadable root fails construction, which callers
//! treat as fatal for the whole operation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ignore::IgnoreFilter;
use crate::progress::{ProgressSink, ProgressSinkExt};

/// Whether a traversal entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Immutable snapshot of a filesystem entry taken at traversal time.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute (or root-joined) path of the entry.
    pub path: PathBuf,
    /// Final name component.
    pub name: String,
    /// Path relative to the organization root.
    pub relative_path: PathBuf,
    /// File or directory.
    pub kind: EntryKind,
}

/// Error raised when the traversal root itself cannot be read.
#[derive(Debug)]
pub struct WalkError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to read directory {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for WalkError {}

/// Depth-first iterator over the entries of a source tree.
pub struct TreeWalker<'a> {
    stack: Vec<FileEntry>,
    recursive: bool,
    /// Output directory to skip, present only when nested inside the root.
    skip_output: Option<PathBuf>,
    filter: &'a IgnoreFilter,
    sink: &'a dyn ProgressSink,
}

impl<'a> TreeWalker<'a> {
    /// Start a traversal of `root`.
    ///
    /// # Errors
    ///
    /// Fails if the root directory cannot be read; deeper read failures are
    /// reported through the sink instead and skip only the affected subtree.
    pub fn new(
        root: &Path,
        recursive: bool,
        output_dir: Option<&Path>,
        filter: &'a IgnoreFilter,
        sink: &'a dyn ProgressSink,
    ) -> Result<Self, WalkError> {
        let skip_output = output_dir
            .filter(|out| out.starts_with(root))
            .map(|out| out.to_path_buf());

        let mut walker = Self {
            stack: Vec::new(),
            recursive,
            skip_output,
            filter,
            sink,
        };
        let children = read_sorted(root, PathBuf::new()).map_err(|source| WalkError {
            path: root.to_path_buf(),
            source,
        })?;
        walker.push_children(children);
        Ok(walker)
    }

    fn push_children(&mut self, mut children: Vec<FileEntry>) {
        // The stack pops from the back, so reversed sorted order yields
        // entries in name order.
        children.reverse();
        self.stack.extend(children);
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        while let Some(entry) = self.stack.pop() {
            if self.filter.should_ignore(&entry.name) {
                self.sink
                    .info(format!("Skipping reserved entry: {}", entry.path.display()));
                continue;
            }

            if let Some(skip) = &self.skip_output
                && entry.kind == EntryKind::Directory
                && entry.path == *skip
            {
                self.sink.info(format!(
                    "Skipping output directory itself: {}",
                    entry.path.display()
                ));
                continue;
            }

            match entry.kind {
                EntryKind::File => return Some(entry),
                EntryKind::Directory => {
                    if !self.recursive {
                        self.sink
                            .info(format!("Skipping subdirectory (non-recursive): {}", entry.name));
                        continue;
                    }
                    match read_sorted(&entry.path, entry.relative_path.clone()) {
                        Ok(children) => {
                            self.push_children(children);
                            return Some(entry);
                        }
                        Err(e) => {
                            self.sink.error(format!(
                                "Failed to read directory {}: {}",
                                entry.path.display(),
                                e
                            ));
                            continue;
                        }
                    }
                }
            }
        }
        None
    }
}

/// Read one directory level, sorted by name for a deterministic feed.
fn read_sorted(dir: &Path, parent_relative: PathBuf) -> std::io::Result<Vec<FileEntry>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            // Symlinks and other special entries are left untouched.
            continue;
        };
        let name = entry.file_name().to_string_lossy().to_string();
        children.push(FileEntry {
            path: entry.path(),
            relative_path: parent_relative.join(&name),
            name,
            kind,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}
