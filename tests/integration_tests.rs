//! Integration tests for filesift.
//!
//! These tests exercise the engine end-to-end over real temporary
//! directories: rule-based organization, LLM organization with a scripted
//! classifier, dry-run caching, plan save/apply, and cleanup behavior.
//!
//! Test categories:
//! 1. Rule-based organization workflows
//! 2. Collision handling
//! 3. Dry-run mode and cache reuse
//! 4. LLM classification fallbacks
//! 5. Preview plans and execution
//! 6. Cleanup and output-directory behavior

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use filesift::config::Settings;
use filesift::llm::{LlmError, RemoteClassifier, validate_classification};
use filesift::organizer::{
    LlmOrganizeRequest, ManualOrganizeRequest, Organizer, PreviewRequest, SuggestRequest,
};
use filesift::plan::OrganizationPlan;
use filesift::progress::{LogLevel, NullSink, ProgressEvent, ProgressSink};
use filesift::rules::{ClassificationRule, MatchKind};
use filesift::snapshot::NullSnapshotter;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with a configurable
/// file structure.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content in the test directory.
    fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Should not exist: {}", path.display());
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }
}

/// Engine with the no-op snapshotter, so tests don't produce log folders
/// unless they ask to.
fn organizer() -> Organizer {
    Organizer::new(&Settings::default())
        .expect("default settings compile")
        .with_snapshotter(Box::new(NullSnapshotter))
}

/// Sink that records every event for assertions.
#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl CollectingSink {
    fn error_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ProgressEvent::Log {
                        level: LogLevel::Error,
                        ..
                    }
                )
            })
            .count()
    }

    fn contains_log(&self, needle: &str) -> bool {
        self.events.lock().unwrap().iter().any(|e| match e {
            ProgressEvent::Log { message, .. } => message.contains(needle),
            _ => false,
        })
    }
}

/// Remote classifier scripted with per-filename raw answers; anything not
/// scripted answers the `none` sentinel. Counts classification calls.
struct ScriptedClassifier {
    responses: HashMap<String, String>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(responses: &[(&str, &str)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn always_none() -> Self {
        Self::new(&[])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        file_name: &str,
        categories: &[String],
    ) -> Result<Option<String>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = self
            .responses
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| "none".to_string());
        Ok(validate_classification(&raw, categories))
    }

    async fn suggest_categories(
        &self,
        _samples: &[String],
        _focus: Option<&str>,
        _desired_count: Option<usize>,
    ) -> Result<Vec<String>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["Photos".to_string(), "Paperwork".to_string()])
    }
}

/// Classifier whose every call fails, for fail-soft tests.
struct FailingClassifier;

#[async_trait]
impl RemoteClassifier for FailingClassifier {
    async fn classify(
        &self,
        _file_name: &str,
        _categories: &[String],
    ) -> Result<Option<String>, LlmError> {
        Err(LlmError::EmptyResponse)
    }

    async fn suggest_categories(
        &self,
        _samples: &[String],
        _focus: Option<&str>,
        _desired_count: Option<usize>,
    ) -> Result<Vec<String>, LlmError> {
        Err(LlmError::EmptyResponse)
    }
}

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn llm_request(fixture: &TestFixture, cats: &[&str], dry_run: bool) -> LlmOrganizeRequest {
    LlmOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        categories: categories(cats),
        credential: "test-key".to_string(),
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run,
    }
}

// ============================================================================
// Test Suite 1: Rule-Based Organization
// ============================================================================

#[test]
fn test_rules_split_images_from_rest() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg bytes");
    fixture.create_file("b.txt", "text");
    fixture.create_file("c.jpg", "jpeg bytes");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            ".jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: false,
        dry_run: false,
    };
    let report = organizer().organize_manual(&request, &NullSink);

    assert!(report.success);
    assert_eq!(report.processed, 3);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Images/c.jpg");
    fixture.assert_file_exists("Other/b.txt");
    fixture.assert_not_exists("a.jpg");
}

#[test]
fn test_keyword_rule_beats_later_rules() {
    let fixture = TestFixture::new();
    fixture.create_file("2024_invoice_final.pdf", "pdf");
    fixture.create_file("notes.pdf", "pdf");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![
            ClassificationRule::new("Finance", MatchKind::Keyword, "invoice"),
            ClassificationRule::new("Documents", MatchKind::Extension, "pdf"),
        ],
        unclassified_folder: "Other".to_string(),
        recursive: false,
        dry_run: false,
    };
    organizer().organize_manual(&request, &NullSink);

    fixture.assert_file_exists("Finance/2024_invoice_final.pdf");
    fixture.assert_file_exists("Documents/notes.pdf");
}

#[test]
fn test_reserved_entries_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_file(".DS_Store", "meta");
    fixture.create_file("a.jpg", "jpeg");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    organizer().organize_manual(&request, &NullSink);

    fixture.assert_file_exists(".DS_Store");
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_not_exists("Other/.DS_Store");
}

// ============================================================================
// Test Suite 2: Collision Handling
// ============================================================================

#[test]
fn test_same_named_files_get_numbered_suffixes() {
    let fixture = TestFixture::new();
    fixture.create_subdir("sub1");
    fixture.create_subdir("sub2");
    fixture.create_file("sub1/report.txt", "first");
    fixture.create_file("sub2/report.txt", "second");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new("Docs", MatchKind::Extension, "txt")],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    let report = organizer().organize_manual(&request, &NullSink);

    assert!(report.success);
    assert_eq!(report.processed, 2);
    fixture.assert_file_exists("Docs/report.txt");
    fixture.assert_file_exists("Docs/report_1.txt");
    // Traversal order is by name, so sub1's copy kept the bare name.
    assert_eq!(
        fs::read_to_string(fixture.path().join("Docs/report.txt")).unwrap(),
        "first"
    );
}

#[test]
fn test_file_already_in_place_is_not_suffixed() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Docs");
    fixture.create_file("Docs/report.txt", "content");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new("Docs", MatchKind::Extension, "txt")],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    let report = organizer().organize_manual(&request, &NullSink);

    assert!(report.success);
    fixture.assert_file_exists("Docs/report.txt");
    fixture.assert_not_exists("Docs/report_1.txt");
    fixture.assert_not_exists("Docs/Docs");
}

// ============================================================================
// Test Suite 3: Dry Runs and Cache Reuse
// ============================================================================

#[test]
fn test_dry_run_reports_without_moving() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");
    fixture.create_file("b.txt", "text");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: false,
        dry_run: true,
    };
    let sink = CollectingSink::default();
    let report = organizer().organize_manual(&request, &sink);

    assert!(report.success);
    assert_eq!(report.processed, 2);
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.txt");
    fixture.assert_not_exists("Images");
    fixture.assert_not_exists("Other");
    assert!(sink.contains_log("would be moved"));
}

#[tokio::test]
async fn test_real_run_replays_dry_run_decisions_for_free() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");
    fixture.create_file("b.txt", "text");
    fixture.create_file("c.bin", "data");

    let classifier = ScriptedClassifier::new(&[("a.jpg", "Images"), ("b.txt", "Docs")]);
    let engine = organizer();

    let dry = engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images", "Docs"], true),
            &classifier,
            &NullSink,
        )
        .await;
    assert!(dry.success);
    assert_eq!(classifier.calls(), 3);
    fixture.assert_file_exists("a.jpg");

    let sink = CollectingSink::default();
    let real = engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images", "Docs"], false),
            &classifier,
            &sink,
        )
        .await;

    assert!(real.success);
    assert_eq!(real.processed, 3);
    // Zero additional classification calls on the matching real run.
    assert_eq!(classifier.calls(), 3);
    assert!(sink.contains_log("(cache)"));
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Docs/b.txt");
    fixture.assert_file_exists("Other/c.bin");
}

#[tokio::test]
async fn test_changed_categories_invalidate_cache() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");
    fixture.create_file("b.txt", "text");

    let classifier = ScriptedClassifier::new(&[("a.jpg", "Images")]);
    let engine = organizer();

    engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images"], true),
            &classifier,
            &NullSink,
        )
        .await;
    assert_eq!(classifier.calls(), 2);

    // Same tree, different confirmed categories: every file is fresh.
    let real = engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images", "Docs"], false),
            &classifier,
            &NullSink,
        )
        .await;

    assert!(real.success);
    assert_eq!(classifier.calls(), 4);
}

#[tokio::test]
async fn test_files_added_after_dry_run_are_classified_fresh() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");

    let classifier = ScriptedClassifier::new(&[("a.jpg", "Images"), ("late.jpg", "Images")]);
    let engine = organizer();

    engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images"], true),
            &classifier,
            &NullSink,
        )
        .await;
    assert_eq!(classifier.calls(), 1);

    fixture.create_file("late.jpg", "jpeg");
    let real = engine
        .organize_with_llm(
            &llm_request(&fixture, &["Images"], false),
            &classifier,
            &NullSink,
        )
        .await;

    assert!(real.success);
    assert_eq!(real.processed, 2);
    // One extra call for the file the dry run never saw.
    assert_eq!(classifier.calls(), 2);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Images/late.jpg");
}

// ============================================================================
// Test Suite 4: LLM Classification Fallbacks
// ============================================================================

#[tokio::test]
async fn test_all_none_answers_land_in_unclassified_folder() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");
    fixture.create_file("b.txt", "text");

    let classifier = ScriptedClassifier::always_none();
    let sink = CollectingSink::default();
    let report = organizer()
        .organize_with_llm(
            &llm_request(&fixture, &["Images", "Docs"], false),
            &classifier,
            &sink,
        )
        .await;

    assert!(report.success);
    assert_eq!(report.processed, 2);
    assert_eq!(sink.error_count(), 0);
    fixture.assert_file_exists("Other/a.jpg");
    fixture.assert_file_exists("Other/b.txt");
}

#[tokio::test]
async fn test_service_failures_degrade_to_unclassified() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");

    let sink = CollectingSink::default();
    let report = organizer()
        .organize_with_llm(
            &llm_request(&fixture, &["Images"], false),
            &FailingClassifier,
            &sink,
        )
        .await;

    assert!(report.success);
    assert_eq!(report.processed, 1);
    assert!(sink.error_count() > 0);
    fixture.assert_file_exists("Other/a.jpg");
}

#[tokio::test]
async fn test_missing_credential_aborts_before_traversal() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");

    let mut request = llm_request(&fixture, &["Images"], false);
    request.credential = String::new();

    let classifier = ScriptedClassifier::always_none();
    let report = organizer()
        .organize_with_llm(&request, &classifier, &NullSink)
        .await;

    assert!(!report.success);
    assert_eq!(classifier.calls(), 0);
    fixture.assert_file_exists("a.jpg");
}

#[tokio::test]
async fn test_suggestions_are_memoized_per_request() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");

    let classifier = ScriptedClassifier::always_none();
    let engine = organizer();
    let request = SuggestRequest {
        source: fixture.path().to_path_buf(),
        credential: "test-key".to_string(),
        focus: None,
        desired_count: None,
        max_samples: 100,
        recursive: true,
    };

    let first = engine
        .suggest_categories(&request, &classifier, &NullSink)
        .await
        .unwrap();
    assert_eq!(first, vec!["Photos", "Paperwork"]);
    assert_eq!(classifier.calls(), 1);

    let second = engine
        .suggest_categories(&request, &classifier, &NullSink)
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(classifier.calls(), 1);

    // A different focus is a different request.
    let mut changed = request.clone();
    changed.focus = Some("by project".to_string());
    engine
        .suggest_categories(&changed, &classifier, &NullSink)
        .await
        .unwrap();
    assert_eq!(classifier.calls(), 2);
}

// ============================================================================
// Test Suite 5: Preview Plans and Execution
// ============================================================================

#[tokio::test]
async fn test_preview_then_apply_round_trip() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");
    fixture.create_file("b.txt", "text");

    let classifier = ScriptedClassifier::new(&[("a.jpg", "Images")]);
    let engine = organizer();
    let request = PreviewRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        categories: categories(&["Images", "Docs"]),
        credential: "test-key".to_string(),
        unclassified_folder: "Other".to_string(),
        recursive: true,
    };

    let preview = engine.preview(&request, &classifier, &NullSink).await;
    assert!(preview.success);
    assert_eq!(preview.classifications.len(), 2);
    assert_eq!(preview.category_summary.get("Images"), Some(&1));
    assert_eq!(preview.category_summary.get("Other"), Some(&1));
    assert_eq!(preview.category_summary.get("Docs"), Some(&0));
    // Preview never mutates the tree.
    fixture.assert_file_exists("a.jpg");
    fixture.assert_not_exists("Images");

    let plan_path = OrganizationPlan::default_path(fixture.path());
    let plan = OrganizationPlan::new(
        fixture.path().to_path_buf(),
        None,
        preview.classifications,
    );
    plan.save(&plan_path).unwrap();

    let loaded = OrganizationPlan::load(&plan_path).unwrap();
    let report =
        engine.execute_plan(fixture.path(), None, &loaded.classifications, &NullSink);

    assert!(report.success);
    assert_eq!(report.processed, 2);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Other/b.txt");
}

#[tokio::test]
async fn test_apply_resolves_conflicts_that_appeared_after_preview() {
    let fixture = TestFixture::new();
    fixture.create_file("report.txt", "original");

    let classifier = ScriptedClassifier::new(&[("report.txt", "Docs")]);
    let engine = organizer();
    let request = PreviewRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        categories: categories(&["Docs"]),
        credential: "test-key".to_string(),
        unclassified_folder: "Other".to_string(),
        recursive: false,
    };
    let preview = engine.preview(&request, &classifier, &NullSink).await;

    // A conflicting file shows up between preview and apply.
    fixture.create_subdir("Docs");
    fixture.create_file("Docs/report.txt", "squatter");

    let report =
        engine.execute_plan(fixture.path(), None, &preview.classifications, &NullSink);

    assert!(report.success);
    fixture.assert_file_exists("Docs/report.txt");
    fixture.assert_file_exists("Docs/report_1.txt");
    assert_eq!(
        fs::read_to_string(fixture.path().join("Docs/report.txt")).unwrap(),
        "squatter"
    );
    assert_eq!(
        fs::read_to_string(fixture.path().join("Docs/report_1.txt")).unwrap(),
        "original"
    );
}

// ============================================================================
// Test Suite 6: Cleanup and Output Directories
// ============================================================================

#[test]
fn test_emptied_subdirectories_are_removed_in_place() {
    let fixture = TestFixture::new();
    fixture.create_subdir("sub");
    fixture.create_file("sub/a.jpg", "jpeg");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    organizer().organize_manual(&request, &NullSink);

    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_not_exists("sub");
}

#[test]
fn test_subdirectory_with_unprocessed_file_is_preserved() {
    let fixture = TestFixture::new();
    fixture.create_subdir("sub");
    fixture.create_file("sub/a.jpg", "jpeg");
    fixture.create_file("sub/keep.bak", "data");

    // keep.bak is excluded from traversal by a user ignore rule, so it never
    // moves; the directory holding it must survive cleanup.
    let mut settings = Settings::default();
    settings.ignore.extensions = vec!["bak".to_string()];
    let engine = Organizer::new(&settings)
        .expect("settings compile")
        .with_snapshotter(Box::new(NullSnapshotter));

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    let report = engine.organize_manual(&request, &NullSink);

    assert!(report.success);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("sub/keep.bak");
    fixture.assert_dir_exists("sub");
}

#[test]
fn test_external_output_leaves_source_tree_untouched() {
    let fixture = TestFixture::new();
    let output = TempDir::new().expect("Failed to create temp directory");
    fixture.create_subdir("sub");
    fixture.create_file("sub/a.jpg", "jpeg");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: Some(output.path().join("sorted")),
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    let report = organizer().organize_manual(&request, &NullSink);

    assert!(report.success);
    assert!(output.path().join("sorted/Images/a.jpg").exists());
    // No cleanup when organizing into a separate tree: the emptied source
    // subdirectory is intentionally left in place.
    fixture.assert_dir_exists("sub");
}

#[test]
fn test_nested_output_directory_is_not_reorganized() {
    let fixture = TestFixture::new();
    let output = fixture.path().join("sorted");
    fs::create_dir(&output).unwrap();
    fixture.create_file("sorted/already.jpg", "jpeg");
    fixture.create_file("new.jpg", "jpeg");

    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: Some(output.clone()),
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: true,
        dry_run: false,
    };
    let report = organizer().organize_manual(&request, &NullSink);

    assert!(report.success);
    assert_eq!(report.processed, 1);
    fixture.assert_file_exists("sorted/Images/new.jpg");
    // The file already inside the output tree stays where it was.
    fixture.assert_file_exists("sorted/already.jpg");
}

#[test]
fn test_snapshot_written_on_real_run_with_default_engine() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpeg");

    let engine = Organizer::new(&Settings::default()).expect("default settings compile");
    let request = ManualOrganizeRequest {
        source: fixture.path().to_path_buf(),
        output: None,
        rules: vec![ClassificationRule::new(
            "Images",
            MatchKind::Extension,
            "jpg",
        )],
        unclassified_folder: "Other".to_string(),
        recursive: false,
        dry_run: false,
    };
    engine.organize_manual(&request, &NullSink);

    let log_dir = fixture.path().join(".filesift-logs");
    assert!(log_dir.is_dir(), "snapshot folder should exist");
    let snapshots: Vec<PathBuf> = fs::read_dir(&log_dir)
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert_eq!(snapshots.len(), 1);
    let content = fs::read_to_string(&snapshots[0]).unwrap();
    assert!(content.contains("- a.jpg"));
}
