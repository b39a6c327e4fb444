//! The organization engine.
//!
//! One request object per operation; traversal, classification, and moves
//! interleave file by file in a single sequential stream, so at most one
//! remote classification call is in flight and per-file log lines arrive in
//! traversal order. Progress goes to an injected [`ProgressSink`]; the
//! structure snapshot goes to an injected [`StructureSnapshotter`].
//!
//! Failure policy: request-level preconditions (missing credential,
//! nonexistent source) and directory-creation failures abort a pass.
//! Everything per-file (a failed classification, a failed move, an
//! unreadable subdirectory) is logged and skipped so the rest of the batch
//! still completes.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheLookup, ClassificationCache, RequestFingerprint};
use crate::config::{ConfigError, Settings};
use crate::ignore::IgnoreFilter;
use crate::llm::RemoteClassifier;
use crate::mover::{self, MoveOutcome, OrganizeError, OrganizeResult};
use crate::progress::{ProgressSink, ProgressSinkExt};
use crate::rules::{self, ClassificationRule};
use crate::snapshot::{MarkdownSnapshotter, StructureSnapshotter};
use crate::walker::{EntryKind, FileEntry, TreeWalker};

/// Default number of filename samples collected for category suggestions.
pub const DEFAULT_SUGGESTION_SAMPLES: usize = 100;

/// Manual organization: classify by user rules, move or simulate.
#[derive(Debug, Clone)]
pub struct ManualOrganizeRequest {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    pub rules: Vec<ClassificationRule>,
    pub unclassified_folder: String,
    pub recursive: bool,
    pub dry_run: bool,
}

/// LLM organization: classify against a confirmed category list.
///
/// `credential` is the raw API key; it doubles as the credential identity in
/// the request fingerprint, so a dry run and the real run that replays it
/// must carry the same value.
#[derive(Debug, Clone)]
pub struct LlmOrganizeRequest {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    pub categories: Vec<String>,
    pub credential: String,
    pub unclassified_folder: String,
    pub recursive: bool,
    pub dry_run: bool,
}

/// Category suggestion from a sample of filenames.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestRequest {
    pub source: PathBuf,
    pub credential: String,
    pub focus: Option<String>,
    pub desired_count: Option<usize>,
    pub max_samples: usize,
    pub recursive: bool,
}

/// Quick preview: classify everything, return the plan without moving.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    pub categories: Vec<String>,
    pub credential: String,
    pub unclassified_folder: String,
    pub recursive: bool,
}

/// Final outcome of an organization pass.
///
/// Per-file failures are reported as log events, not accumulated here; the
/// processed count tells the caller how many files actually reached a
/// terminal success state.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub success: bool,
    pub message: String,
    pub processed: u64,
}

impl ExecutionReport {
    fn completed(message: impl Into<String>, processed: u64) -> Self {
        Self {
            success: true,
            message: message.into(),
            processed,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            processed: 0,
        }
    }
}

/// One file's preview decision, as stored in an organization plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileClassification {
    pub file_path: PathBuf,
    pub file_name: String,
    pub relative_path: PathBuf,
    /// Final folder name; the unclassified fallback is already applied.
    pub category: String,
    /// Naive target (`base/category/name`); conflicts are resolved at
    /// execution time against the filesystem as it is then.
    pub target_path: PathBuf,
}

/// Result of a preview operation.
#[derive(Debug, Clone)]
pub struct OrganizationPreview {
    pub success: bool,
    pub message: String,
    pub classifications: Vec<FileClassification>,
    /// Per-category file counts, category names sorted.
    pub category_summary: BTreeMap<String, usize>,
}

impl OrganizationPreview {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            classifications: Vec::new(),
            category_summary: BTreeMap::new(),
        }
    }
}

/// Where a file's category decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Rule,
    Llm,
    Cache,
}

impl Provenance {
    fn label(self) -> &'static str {
        match self {
            Provenance::Rule => "rule",
            Provenance::Llm => "llm",
            Provenance::Cache => "cache",
        }
    }
}

/// The engine. Holds the process-lifetime dry-run classification cache and
/// the suggestion memo; everything else lives per request.
pub struct Organizer {
    filter: IgnoreFilter,
    save_structure_snapshot: bool,
    snapshotter: Box<dyn StructureSnapshotter + Send + Sync>,
    cache: Mutex<ClassificationCache>,
    suggestion_memo: Mutex<Option<(SuggestRequest, Vec<String>)>>,
}

impl Organizer {
    /// Build an engine from a settings snapshot.
    ///
    /// # Errors
    ///
    /// Fails when the extra ignore rules in the settings do not compile.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: IgnoreFilter::with_extra_rules(&settings.ignore)?,
            save_structure_snapshot: settings.save_structure_snapshot,
            snapshotter: Box::new(MarkdownSnapshotter),
            cache: Mutex::new(ClassificationCache::new()),
            suggestion_memo: Mutex::new(None),
        })
    }

    /// Replace the snapshot writer (tests inject a no-op here).
    pub fn with_snapshotter(
        mut self,
        snapshotter: Box<dyn StructureSnapshotter + Send + Sync>,
    ) -> Self {
        self.snapshotter = snapshotter;
        self
    }

    /// Organize by user-defined rules.
    pub fn organize_manual(
        &self,
        req: &ManualOrganizeRequest,
        sink: &dyn ProgressSink,
    ) -> ExecutionReport {
        let mode = if req.dry_run { "dry run" } else { "organization" };
        sink.status(if req.dry_run {
            "Simulating organization...".to_string()
        } else {
            "Organizing files...".to_string()
        });
        sink.info(format!(
            "Starting {}: source {}",
            mode,
            req.source.display()
        ));
        self.log_target(req.output.as_deref(), sink);
        sink.info(format!(
            "Rules: {}, unclassified folder: \"{}\", recursive: {}, dry run: {}",
            req.rules.len(),
            req.unclassified_folder,
            req.recursive,
            req.dry_run
        ));

        if let Err(e) = validate_source(&req.source) {
            sink.error(e.to_string());
            return ExecutionReport::failed(e.to_string());
        }
        let rule_categories: Vec<String> =
            req.rules.iter().map(|r| r.category.clone()).collect();
        warn_on_unclassified_collision(&rule_categories, &req.unclassified_folder, sink);

        if !req.dry_run {
            self.record_snapshot(&req.source, req.output.as_deref(), sink);
        }
        if let Err(report) = self.prepare_output(req.output.as_deref(), req.dry_run, sink) {
            return report;
        }

        let base_target = req.output.as_deref().unwrap_or(req.source.as_path());
        let walker = match TreeWalker::new(
            &req.source,
            req.recursive,
            req.output.as_deref(),
            &self.filter,
            sink,
        ) {
            Ok(walker) => walker,
            Err(e) => {
                sink.error(e.to_string());
                return ExecutionReport::failed(e.to_string());
            }
        };

        let mut processed: u64 = 0;
        let mut source_dirs: HashSet<PathBuf> = HashSet::new();
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();

        for entry in walker {
            if entry.kind == EntryKind::Directory {
                sink.info(format!("Entering subdirectory: {}", entry.name));
                continue;
            }
            sink.info(format!("Processing file: {}", entry.name));

            let matched = rules::classify(&entry.name, &req.rules);
            match matched {
                Some(category) => {
                    sink.info(format!("File \"{}\" matched rule \"{}\"", entry.name, category));
                }
                None => {
                    sink.info(format!(
                        "File \"{}\" matched no rule, assigned to \"{}\"",
                        entry.name, req.unclassified_folder
                    ));
                }
            }
            let folder = matched.unwrap_or(&req.unclassified_folder).to_string();
            *summary.entry(folder.clone()).or_insert(0) += 1;

            match self.place_file(&entry, &folder, base_target, req.dry_run, sink, &mut processed)
            {
                Ok(()) => {
                    if let Some(parent) = entry.path.parent() {
                        source_dirs.insert(parent.to_path_buf());
                    }
                }
                Err(e) => {
                    sink.error(e.to_string());
                    sink.status("Organization failed.");
                    return ExecutionReport::failed(e.to_string());
                }
            }
        }

        if req.dry_run {
            log_summary(&summary, sink);
        } else if req.output.is_none() {
            self.cleanup_empty_dirs(&req.source, source_dirs, sink);
        }

        sink.status(if req.dry_run {
            "Dry run complete."
        } else {
            "Organization complete."
        });
        let message = if req.dry_run {
            format!("Dry run completed: {} files would be processed.", processed)
        } else {
            format!("Organization completed: {} files processed.", processed)
        };
        if req.dry_run {
            sink.dry_run(message.clone());
        } else {
            sink.success(message.clone());
        }
        ExecutionReport::completed(message, processed)
    }

    /// Organize by remote classification against a confirmed category list.
    ///
    /// A dry run rebinds the classification cache to this request's
    /// fingerprint and records every decision. A real run with the same
    /// fingerprint replays those decisions without calling the service;
    /// any fingerprint difference clears the cache and classifies fresh.
    pub async fn organize_with_llm(
        &self,
        req: &LlmOrganizeRequest,
        classifier: &dyn RemoteClassifier,
        sink: &dyn ProgressSink,
    ) -> ExecutionReport {
        sink.status(if req.dry_run {
            "Simulating LLM organization..."
        } else {
            "LLM organization in progress..."
        });
        sink.info(format!(
            "Starting LLM organization: source {}",
            req.source.display()
        ));
        self.log_target(req.output.as_deref(), sink);
        sink.info(format!("Categories: {}", req.categories.join(", ")));

        if req.credential.is_empty() {
            let e = OrganizeError::MissingCredential;
            sink.error(e.to_string());
            return ExecutionReport::failed(e.to_string());
        }
        if let Err(e) = validate_source(&req.source) {
            sink.error(e.to_string());
            return ExecutionReport::failed(e.to_string());
        }
        warn_on_unclassified_collision(&req.categories, &req.unclassified_folder, sink);

        let fingerprint = RequestFingerprint::new(
            &req.source,
            req.output.as_deref(),
            &req.categories,
            &req.unclassified_folder,
            req.recursive,
            &req.credential,
        );
        let reuse_cache = {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if req.dry_run {
                cache.bind(fingerprint.clone());
                false
            } else if cache.matches(&fingerprint) {
                sink.info(format!(
                    "Reusing {} classification decisions from the previous dry run.",
                    cache.len()
                ));
                true
            } else {
                if !cache.is_empty() {
                    sink.info("Previous dry-run decisions do not match this request; classifying fresh.");
                }
                cache.clear();
                false
            }
        };

        if !req.dry_run {
            self.record_snapshot(&req.source, req.output.as_deref(), sink);
        }
        if let Err(report) = self.prepare_output(req.output.as_deref(), req.dry_run, sink) {
            return report;
        }

        let base_target = req.output.as_deref().unwrap_or(req.source.as_path());
        let walker = match TreeWalker::new(
            &req.source,
            req.recursive,
            req.output.as_deref(),
            &self.filter,
            sink,
        ) {
            Ok(walker) => walker,
            Err(e) => {
                sink.error(e.to_string());
                return ExecutionReport::failed(e.to_string());
            }
        };
        let mut processed: u64 = 0;
        let mut source_dirs: HashSet<PathBuf> = HashSet::new();
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();

        for entry in walker {
            if entry.kind == EntryKind::Directory {
                sink.info(format!("Entering subdirectory: {}", entry.name));
                continue;
            }
            sink.info(format!("Processing file: {}", entry.name));

            let (category, provenance) = if reuse_cache {
                let lookup = {
                    let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
                    cache.get(&entry.path)
                };
                match lookup {
                    CacheLookup::Hit(category) => (category, Provenance::Cache),
                    CacheLookup::Miss => (
                        classify_soft(classifier, &entry.name, &req.categories, sink).await,
                        Provenance::Llm,
                    ),
                }
            } else {
                let category =
                    classify_soft(classifier, &entry.name, &req.categories, sink).await;
                if req.dry_run {
                    let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
                    cache.put(entry.path.clone(), category.clone());
                }
                (category, Provenance::Llm)
            };

            match &category {
                Some(c) => sink.info(format!(
                    "File \"{}\" classified as \"{}\" ({})",
                    entry.name,
                    c,
                    provenance.label()
                )),
                None => sink.info(format!(
                    "File \"{}\" left unclassified, assigned to \"{}\" ({})",
                    entry.name,
                    req.unclassified_folder,
                    provenance.label()
                )),
            }
            let folder = category.unwrap_or_else(|| req.unclassified_folder.clone());
            *summary.entry(folder.clone()).or_insert(0) += 1;

            match self.place_file(&entry, &folder, base_target, req.dry_run, sink, &mut processed)
            {
                Ok(()) => {
                    if let Some(parent) = entry.path.parent() {
                        source_dirs.insert(parent.to_path_buf());
                    }
                }
                Err(e) => {
                    sink.error(e.to_string());
                    sink.status("LLM organization failed.");
                    return ExecutionReport::failed(e.to_string());
                }
            }
        }

        if req.dry_run {
            log_summary(&summary, sink);
        } else if req.output.is_none() {
            self.cleanup_empty_dirs(&req.source, source_dirs, sink);
        }

        sink.status(if req.dry_run {
            "LLM dry run complete."
        } else {
            "LLM organization complete!"
        });
        let message = if req.dry_run {
            format!(
                "LLM dry run completed: {} files would be processed.",
                processed
            )
        } else {
            format!("LLM organization completed: {} files processed.", processed)
        };
        if req.dry_run {
            sink.dry_run(message.clone());
        } else {
            sink.success(message.clone());
        }
        ExecutionReport::completed(message, processed)
    }

    /// Ask the remote service for an initial category set.
    ///
    /// Unlike per-file classification there is no soft fallback: without
    /// categories there is nothing to organize, so a service failure or a
    /// malformed payload is returned as an error.
    pub async fn suggest_categories(
        &self,
        req: &SuggestRequest,
        classifier: &dyn RemoteClassifier,
        sink: &dyn ProgressSink,
    ) -> OrganizeResult<Vec<String>> {
        {
            let memo = self.suggestion_memo.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((previous, suggestions)) = memo.as_ref()
                && previous == req
                && !suggestions.is_empty()
            {
                sink.info("Reusing cached category suggestions.");
                return Ok(suggestions.clone());
            }
        }

        if req.credential.is_empty() {
            return Err(OrganizeError::MissingCredential);
        }
        validate_source(&req.source)?;

        sink.info("Collecting file name samples...");
        let walker = TreeWalker::new(&req.source, req.recursive, None, &self.filter, sink)
            .map_err(|e| OrganizeError::TraversalFailed {
                path: e.path.clone(),
                reason: e.source.to_string(),
            })?;
        let samples: Vec<String> = walker
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.name)
            .take(req.max_samples)
            .collect();
        sink.info(format!("Collected {} file name samples.", samples.len()));
        if samples.is_empty() {
            sink.info("No file name samples collected.");
            return Ok(Vec::new());
        }

        sink.status("Requesting category suggestions...");
        let suggestions = classifier
            .suggest_categories(&samples, req.focus.as_deref(), req.desired_count)
            .await
            .map_err(|e| OrganizeError::SuggestionFailed {
                reason: e.to_string(),
            })?;
        sink.success(format!("Received {} category suggestions.", suggestions.len()));

        let mut memo = self.suggestion_memo.lock().unwrap_or_else(|e| e.into_inner());
        *memo = Some((req.clone(), suggestions.clone()));
        Ok(suggestions)
    }

    /// Classify every file against a category list without moving anything,
    /// and return the resulting plan plus a per-category summary.
    pub async fn preview(
        &self,
        req: &PreviewRequest,
        classifier: &dyn RemoteClassifier,
        sink: &dyn ProgressSink,
    ) -> OrganizationPreview {
        sink.status("Analyzing files and generating a classification preview...");
        sink.info(format!(
            "Starting classification preview: source {}",
            req.source.display()
        ));
        sink.info(format!("Categories: {}", req.categories.join(", ")));

        if req.credential.is_empty() {
            let e = OrganizeError::MissingCredential;
            sink.error(e.to_string());
            return OrganizationPreview::failed(e.to_string());
        }
        if let Err(e) = validate_source(&req.source) {
            sink.error(e.to_string());
            return OrganizationPreview::failed(e.to_string());
        }
        warn_on_unclassified_collision(&req.categories, &req.unclassified_folder, sink);

        let base_target = req.output.clone().unwrap_or_else(|| req.source.clone());
        let walker = match TreeWalker::new(
            &req.source,
            req.recursive,
            req.output.as_deref(),
            &self.filter,
            sink,
        ) {
            Ok(walker) => walker,
            Err(e) => {
                sink.error(e.to_string());
                return OrganizationPreview::failed(e.to_string());
            }
        };

        let mut classifications = Vec::new();
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();
        for category in &req.categories {
            summary.insert(category.clone(), 0);
        }
        summary.insert(req.unclassified_folder.clone(), 0);

        for entry in walker {
            if entry.kind == EntryKind::Directory {
                sink.info(format!("Entering subdirectory: {}", entry.name));
                continue;
            }
            sink.info(format!("Analyzing file: {}", entry.relative_path.display()));

            let category = classify_soft(classifier, &entry.name, &req.categories, sink)
                .await
                .unwrap_or_else(|| req.unclassified_folder.clone());
            let target_path = base_target.join(&category).join(&entry.name);

            sink.info(format!(
                "File \"{}\" pre-classified as \"{}\"",
                entry.relative_path.display(),
                category
            ));
            *summary.entry(category.clone()).or_insert(0) += 1;
            classifications.push(FileClassification {
                file_path: entry.path.clone(),
                file_name: entry.name.clone(),
                relative_path: entry.relative_path.clone(),
                category,
                target_path,
            });
        }

        let total = classifications.len();
        for (category, count) in &summary {
            if *count > 0 {
                sink.info(format!("{}: {} files", category, count));
            }
        }
        sink.status("Classification preview complete.");
        sink.success(format!("Preview generated for {} files.", total));

        OrganizationPreview {
            success: true,
            message: format!("Preview generated for {} files.", total),
            classifications,
            category_summary: summary,
        }
    }

    /// Execute a previously produced classification list.
    ///
    /// Targets are re-resolved against the live filesystem, so conflicts
    /// that appeared since the preview still get numbered suffixes; files
    /// that vanished are skipped with a log line.
    pub fn execute_plan(
        &self,
        source: &Path,
        output: Option<&Path>,
        classifications: &[FileClassification],
        sink: &dyn ProgressSink,
    ) -> ExecutionReport {
        sink.status("Executing organization plan...");
        sink.info(format!(
            "Executing plan: {} files, source {}",
            classifications.len(),
            source.display()
        ));
        self.log_target(output, sink);

        if let Err(e) = validate_source(source) {
            sink.error(e.to_string());
            return ExecutionReport::failed(e.to_string());
        }
        self.record_snapshot(source, output, sink);
        if let Err(report) = self.prepare_output(output, false, sink) {
            return report;
        }

        let base_target = output.unwrap_or(source);
        let mut source_dirs: HashSet<PathBuf> = HashSet::new();
        for item in classifications {
            if let Some(parent) = item.file_path.parent() {
                source_dirs.insert(parent.to_path_buf());
            }
        }

        // All category directories up front; a failure here aborts the pass.
        let required_dirs: HashSet<PathBuf> = classifications
            .iter()
            .filter_map(|item| item.target_path.parent().map(|p| p.to_path_buf()))
            .collect();
        for dir in &required_dirs {
            match mover::create_dir_if_missing(dir) {
                Ok(true) => sink.success(format!(
                    "Created directory: {}",
                    relative_display(base_target, dir)
                )),
                Ok(false) => {}
                Err(e) => {
                    sink.error(e.to_string());
                    sink.status("Plan execution failed.");
                    return ExecutionReport::failed(e.to_string());
                }
            }
        }

        let mut processed: u64 = 0;
        for item in classifications {
            if !item.file_path.exists() {
                sink.error(format!(
                    "Source file no longer exists, skipping: {}",
                    item.relative_path.display()
                ));
                continue;
            }

            let target_dir = item
                .target_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| base_target.to_path_buf());
            let (target, _renamed) =
                mover::resolve_target(&target_dir, &item.file_name, &item.file_path);

            match mover::move_file(&item.file_path, &target, false) {
                Ok(MoveOutcome::AlreadyInPlace) => {
                    sink.info(format!(
                        "File already at its target, skipping: {}",
                        item.relative_path.display()
                    ));
                    processed += 1;
                    sink.file_processed(processed);
                }
                Ok(MoveOutcome::Moved) => {
                    sink.success(format!(
                        "Moved: {} -> {}",
                        item.relative_path.display(),
                        relative_display(base_target, &target)
                    ));
                    processed += 1;
                    sink.file_processed(processed);
                }
                Ok(MoveOutcome::Planned) => {}
                Err(e) => sink.error(e.to_string()),
            }
        }

        if output.is_none() {
            sink.status("Cleaning up empty directories...");
            self.cleanup_empty_dirs(source, source_dirs, sink);
        }

        sink.status("Plan execution complete.");
        let message = format!("Plan executed: {} files processed.", processed);
        sink.success(message.clone());
        ExecutionReport::completed(message, processed)
    }

    /// Create the category dir if needed, resolve the collision-free target,
    /// and move (or simulate). Directory-creation failures propagate;
    /// per-file move failures are logged here and swallowed.
    fn place_file(
        &self,
        entry: &FileEntry,
        folder: &str,
        base_target: &Path,
        dry_run: bool,
        sink: &dyn ProgressSink,
        processed: &mut u64,
    ) -> OrganizeResult<()> {
        let target_dir = base_target.join(folder);
        if !target_dir.exists() {
            if dry_run {
                sink.dry_run(format!("Would create directory: {}", target_dir.display()));
            } else {
                mover::create_dir_if_missing(&target_dir)?;
                sink.success(format!("Created directory: {}", target_dir.display()));
            }
        }

        let (target_path, renamed) = mover::resolve_target(&target_dir, &entry.name, &entry.path);
        match mover::move_file(&entry.path, &target_path, dry_run) {
            Ok(MoveOutcome::Planned) => {
                if renamed {
                    sink.dry_run(format!(
                        "File \"{}\" would be moved and renamed to \"{}\" in \"{}\"",
                        entry.name,
                        file_name_display(&target_path),
                        target_dir.display()
                    ));
                } else {
                    sink.dry_run(format!(
                        "File \"{}\" would be moved to \"{}\"",
                        entry.name,
                        target_path.display()
                    ));
                }
                *processed += 1;
                sink.file_processed(*processed);
            }
            Ok(MoveOutcome::AlreadyInPlace) => {
                sink.info(format!(
                    "File \"{}\" is already at \"{}\", no move needed.",
                    entry.name,
                    target_path.display()
                ));
                *processed += 1;
                sink.file_processed(*processed);
            }
            Ok(MoveOutcome::Moved) => {
                if renamed {
                    sink.success(format!(
                        "Moved file \"{}\" and renamed it to \"{}\" in \"{}\"",
                        entry.name,
                        file_name_display(&target_path),
                        target_dir.display()
                    ));
                } else {
                    sink.success(format!(
                        "Moved file \"{}\" to \"{}\"",
                        entry.name,
                        target_path.display()
                    ));
                }
                *processed += 1;
                sink.file_processed(*processed);
            }
            Err(e) => {
                // The file stays where it was; the pass continues.
                sink.error(e.to_string());
            }
        }
        Ok(())
    }

    /// Remove source directories left empty by the pass, deepest first.
    /// A directory still holding any non-reserved entry is preserved.
    fn cleanup_empty_dirs(
        &self,
        root: &Path,
        dirs: HashSet<PathBuf>,
        sink: &dyn ProgressSink,
    ) {
        let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
        dirs.sort_by(|a, b| b.as_os_str().len().cmp(&a.as_os_str().len()));

        for dir in dirs {
            if dir == root || !dir.exists() {
                continue;
            }

            let remaining = match std::fs::read_dir(&dir) {
                Ok(entries) => entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        let name = e.file_name().to_string_lossy().to_string();
                        !crate::ignore::is_reserved_name(&name)
                    })
                    .count(),
                Err(e) => {
                    sink.error(format!(
                        "Failed to inspect directory {}: {}",
                        relative_display(root, &dir),
                        e
                    ));
                    continue;
                }
            };

            if remaining == 0 {
                match std::fs::remove_dir(&dir) {
                    Ok(()) => sink.success(format!(
                        "Removed empty directory: {}",
                        relative_display(root, &dir)
                    )),
                    Err(e) => sink.error(format!(
                        "Failed to remove directory {}: {}",
                        relative_display(root, &dir),
                        e
                    )),
                }
            }
        }
    }

    fn prepare_output(
        &self,
        output: Option<&Path>,
        dry_run: bool,
        sink: &dyn ProgressSink,
    ) -> Result<(), ExecutionReport> {
        let Some(output) = output else {
            return Ok(());
        };
        if output.exists() {
            return Ok(());
        }
        if dry_run {
            sink.dry_run(format!("Would create output directory: {}", output.display()));
            return Ok(());
        }
        match mover::create_dir_if_missing(output) {
            Ok(_) => {
                sink.success(format!("Created output directory: {}", output.display()));
                Ok(())
            }
            Err(e) => {
                sink.error(e.to_string());
                Err(ExecutionReport::failed(e.to_string()))
            }
        }
    }

    fn record_snapshot(&self, source: &Path, output: Option<&Path>, sink: &dyn ProgressSink) {
        if !self.save_structure_snapshot {
            return;
        }
        sink.info("Recording original directory structure...");
        match self.snapshotter.record(source, output) {
            Ok(location) if !location.as_os_str().is_empty() => {
                sink.success(format!(
                    "Original structure saved to: {}",
                    location.display()
                ));
            }
            Ok(_) => {}
            Err(e) => {
                sink.error(format!("{}; continuing with organization.", e));
            }
        }
    }

    fn log_target(&self, output: Option<&Path>, sink: &dyn ProgressSink) {
        match output {
            Some(output) => sink.info(format!("Output directory: {}", output.display())),
            None => sink.info("Category folders will be created inside the source directory."),
        }
    }
}

fn validate_source(source: &Path) -> OrganizeResult<()> {
    if source.is_dir() {
        Ok(())
    } else {
        Err(OrganizeError::InvalidSourcePath {
            path: source.to_path_buf(),
        })
    }
}

/// Call the remote classifier for one file; failures degrade to
/// unclassified with an error log line.
async fn classify_soft(
    classifier: &dyn RemoteClassifier,
    file_name: &str,
    categories: &[String],
    sink: &dyn ProgressSink,
) -> Option<String> {
    match classifier.classify(file_name, categories).await {
        Ok(category) => category,
        Err(e) => {
            sink.error(format!(
                "Classification failed for \"{}\": {} (treating as unclassified)",
                file_name, e
            ));
            None
        }
    }
}

fn warn_on_unclassified_collision(
    categories: &[String],
    unclassified_folder: &str,
    sink: &dyn ProgressSink,
) {
    if categories.iter().any(|c| c == unclassified_folder) {
        sink.info(format!(
            "Warning: category \"{}\" collides with the unclassified folder name; files placed there cannot be told apart.",
            unclassified_folder
        ));
    }
}

fn log_summary(summary: &BTreeMap<String, usize>, sink: &dyn ProgressSink) {
    if summary.is_empty() {
        return;
    }
    sink.dry_run("Planned files per category:".to_string());
    for (category, count) in summary {
        sink.dry_run(format!(
            "  {}: {} {}",
            category,
            count,
            if *count == 1 { "file" } else { "files" }
        ));
    }
}

fn relative_display(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn file_name_display(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
