//! Persisted organization plans.
//!
//! A preview run classifies every file without touching the tree; saving its
//! classification list lets a later `apply` run execute exactly those
//! decisions without re-classifying. The plan is stored as pretty-printed
//! JSON at the root of the source tree (or wherever the caller points it).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::organizer::FileClassification;

/// Default plan filename, stored at the source tree root. Part of the
/// reserved-name set so organization passes never move it.
pub const PLAN_FILE_NAME: &str = ".filesift_plan.json";

/// Errors that can occur while persisting or loading a plan.
#[derive(Debug)]
pub enum PlanError {
    /// Failed to write the plan file.
    WriteFailed { source: std::io::Error },
    /// Failed to read the plan file.
    ReadFailed { source: std::io::Error },
    /// The plan file exists but could not be parsed.
    InvalidFormat { reason: String },
    /// No plan file exists at the given location.
    NotFound(PathBuf),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::WriteFailed { source } => {
                write!(f, "Failed to write plan file: {}", source)
            }
            PlanError::ReadFailed { source } => write!(f, "Failed to read plan file: {}", source),
            PlanError::InvalidFormat { reason } => {
                write!(f, "Invalid plan file format: {}", reason)
            }
            PlanError::NotFound(path) => {
                write!(f, "No plan file found at {}", path.display())
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// A saved preview: the classification list plus enough metadata to execute
/// it later against the same tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationPlan {
    /// ISO 8601 timestamp of when the preview ran.
    pub created: String,
    /// The source tree the plan was computed for.
    pub source: PathBuf,
    /// Output root, when organizing into a separate tree.
    pub output: Option<PathBuf>,
    /// Per-file decisions in traversal order.
    pub classifications: Vec<FileClassification>,
}

impl OrganizationPlan {
    pub fn new(
        source: PathBuf,
        output: Option<PathBuf>,
        classifications: Vec<FileClassification>,
    ) -> Self {
        Self {
            created: chrono::Utc::now().to_rfc3339(),
            source,
            output,
            classifications,
        }
    }

    /// Default storage location for a plan over `source`.
    pub fn default_path(source: &Path) -> PathBuf {
        source.join(PLAN_FILE_NAME)
    }

    /// Save this plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WriteFailed` if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| PlanError::WriteFailed {
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;
        fs::write(path, json).map_err(|e| PlanError::WriteFailed { source: e })
    }

    /// Load a plan from disk.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` when no file exists at `path`,
    /// `PlanError::ReadFailed` when it cannot be read, and
    /// `PlanError::InvalidFormat` when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        if !path.exists() {
            return Err(PlanError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| PlanError::ReadFailed { source: e })?;
        serde_json::from_str(&content).map_err(|e| PlanError::InvalidFormat {
            reason: e.to_string(),
        })
    }

    /// Delete the plan file, ignoring a missing file.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WriteFailed` if an existing file cannot be removed.
    pub fn delete(path: &Path) -> Result<(), PlanError> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| PlanError::WriteFailed { source: e })?;
        }
        Ok(())
    }
}
