//! Command-line interface.
//!
//! Thin orchestration layer: parses arguments, loads settings, builds the
//! engine with a terminal progress sink, and prints the final result. All
//! organization logic lives in [`crate::organizer`].

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{LlmSettings, Settings, SharedSettings};
use crate::llm::LlmClient;
use crate::organizer::{
    DEFAULT_SUGGESTION_SAMPLES, LlmOrganizeRequest, ManualOrganizeRequest, Organizer,
    PreviewRequest, SuggestRequest,
};
use crate::output::{OutputFormatter, TerminalSink};
use crate::plan::OrganizationPlan;
use crate::rules::parse_rule_spec;

#[derive(Parser)]
#[command(
    name = "filesift",
    version,
    about = "Organize files into category subfolders, by rules or with an LLM."
)]
pub struct Cli {
    /// Path to a settings file (default: .filesiftrc.toml lookup)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Organize a directory using extension/keyword rules
    Organize {
        /// Directory to organize
        source: PathBuf,

        /// Organize into this directory instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Classification rule, e.g. "Images=extension:jpg,png" (repeatable)
        #[arg(short, long = "rule", value_name = "SPEC")]
        rules: Vec<String>,

        /// Folder name for files no rule matches
        #[arg(long)]
        unclassified: Option<String>,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recurse: bool,

        /// Report planned moves without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Organize a directory with LLM classification
    Llm {
        /// Directory to organize
        source: PathBuf,

        /// Organize into this directory instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Confirmed category list, comma-separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// API key (default: from settings)
        #[arg(long)]
        api_key: Option<String>,

        /// Model name override
        #[arg(long)]
        model: Option<String>,

        /// Endpoint override
        #[arg(long)]
        base_url: Option<String>,

        /// Folder name for files the model declines to classify
        #[arg(long)]
        unclassified: Option<String>,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recurse: bool,

        /// Classify and report planned moves without touching the filesystem;
        /// a following real run with identical options reuses the decisions
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the LLM to suggest category names from a sample of filenames
    Suggest {
        /// Directory to sample
        source: PathBuf,

        /// Classification focus, e.g. "by project"
        #[arg(long)]
        focus: Option<String>,

        /// Desired number of categories
        #[arg(long)]
        count: Option<usize>,

        /// Maximum number of filename samples to send
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_SAMPLES)]
        max_samples: usize,

        /// API key (default: from settings)
        #[arg(long)]
        api_key: Option<String>,

        /// Model name override
        #[arg(long)]
        model: Option<String>,

        /// Endpoint override
        #[arg(long)]
        base_url: Option<String>,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recurse: bool,
    },

    /// Classify everything with the LLM and save a plan without moving files
    Preview {
        /// Directory to organize
        source: PathBuf,

        /// Organize into this directory instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Confirmed category list, comma-separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// Where to save the plan (default: .filesift_plan.json in the source)
        #[arg(long, value_name = "FILE")]
        plan: Option<PathBuf>,

        /// API key (default: from settings)
        #[arg(long)]
        api_key: Option<String>,

        /// Model name override
        #[arg(long)]
        model: Option<String>,

        /// Endpoint override
        #[arg(long)]
        base_url: Option<String>,

        /// Folder name for files the model declines to classify
        #[arg(long)]
        unclassified: Option<String>,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recurse: bool,
    },

    /// Execute a previously saved organization plan
    Apply {
        /// Directory the plan was created for
        source: PathBuf,

        /// Plan file to execute (default: .filesift_plan.json in the source)
        #[arg(long, value_name = "FILE")]
        plan: Option<PathBuf>,

        /// Keep the plan file after a successful run
        #[arg(long)]
        keep_plan: bool,
    },
}

/// Run one CLI command to completion.
pub async fn run(cli: Cli) -> Result<(), String> {
    let settings = Settings::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let shared = SharedSettings::new(settings);
    let settings = shared.snapshot();
    let organizer = Organizer::new(&settings).map_err(|e| e.to_string())?;

    match cli.command {
        Command::Organize {
            source,
            output,
            rules,
            unclassified,
            no_recurse,
            dry_run,
        } => {
            let rules = rules
                .iter()
                .map(|spec| parse_rule_spec(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let request = ManualOrganizeRequest {
                source,
                output,
                rules,
                unclassified_folder: unclassified
                    .unwrap_or_else(|| settings.unclassified_folder.clone()),
                recursive: effective_recursive(&settings, no_recurse),
                dry_run,
            };

            let sink = TerminalSink::new();
            let report = organizer.organize_manual(&request, &sink);
            sink.finish();
            finish_report(report.success, &report.message)
        }

        Command::Llm {
            source,
            output,
            categories,
            api_key,
            model,
            base_url,
            unclassified,
            no_recurse,
            dry_run,
        } => {
            let llm = merge_llm_settings(&settings, api_key, model, base_url);
            let client = LlmClient::new(llm.clone()).map_err(|e| e.to_string())?;
            let request = LlmOrganizeRequest {
                source,
                output,
                categories,
                credential: llm.api_key,
                unclassified_folder: unclassified
                    .unwrap_or_else(|| settings.unclassified_folder.clone()),
                recursive: effective_recursive(&settings, no_recurse),
                dry_run,
            };

            let sink = TerminalSink::new();
            let report = organizer.organize_with_llm(&request, &client, &sink).await;
            sink.finish();
            finish_report(report.success, &report.message)
        }

        Command::Suggest {
            source,
            focus,
            count,
            max_samples,
            api_key,
            model,
            base_url,
            no_recurse,
        } => {
            let llm = merge_llm_settings(&settings, api_key, model, base_url);
            let client = LlmClient::new(llm.clone()).map_err(|e| e.to_string())?;
            let request = SuggestRequest {
                source,
                credential: llm.api_key,
                focus,
                desired_count: count,
                max_samples,
                recursive: effective_recursive(&settings, no_recurse),
            };

            let sink = TerminalSink::new();
            let result = organizer.suggest_categories(&request, &client, &sink).await;
            sink.finish();
            match result {
                Ok(suggestions) if suggestions.is_empty() => {
                    OutputFormatter::info("No files to sample; no categories suggested.");
                    Ok(())
                }
                Ok(suggestions) => {
                    OutputFormatter::header("Suggested categories");
                    for suggestion in &suggestions {
                        println!("  - {}", suggestion);
                    }
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            }
        }

        Command::Preview {
            source,
            output,
            categories,
            plan,
            api_key,
            model,
            base_url,
            unclassified,
            no_recurse,
        } => {
            let llm = merge_llm_settings(&settings, api_key, model, base_url);
            let client = LlmClient::new(llm.clone()).map_err(|e| e.to_string())?;
            let request = PreviewRequest {
                source: source.clone(),
                output: output.clone(),
                categories,
                credential: llm.api_key,
                unclassified_folder: unclassified
                    .unwrap_or_else(|| settings.unclassified_folder.clone()),
                recursive: effective_recursive(&settings, no_recurse),
            };

            let sink = TerminalSink::new();
            let preview = organizer.preview(&request, &client, &sink).await;
            sink.finish();
            if !preview.success {
                return Err(preview.message);
            }

            let total = preview.classifications.len();
            let plan_path = plan.unwrap_or_else(|| OrganizationPlan::default_path(&source));
            let plan = OrganizationPlan::new(source.clone(), output, preview.classifications);
            plan.save(&plan_path).map_err(|e| e.to_string())?;

            OutputFormatter::summary_table(&preview.category_summary, total);
            OutputFormatter::success(&format!("Plan saved to {}", plan_path.display()));
            OutputFormatter::info(&format!(
                "Run 'filesift apply {}' to execute it.",
                source.display()
            ));
            Ok(())
        }

        Command::Apply {
            source,
            plan,
            keep_plan,
        } => {
            let plan_path = plan.unwrap_or_else(|| OrganizationPlan::default_path(&source));
            let plan = OrganizationPlan::load(&plan_path).map_err(|e| e.to_string())?;
            if !same_tree(&plan.source, &source) {
                return Err(format!(
                    "Plan at {} was created for {}, not {}",
                    plan_path.display(),
                    plan.source.display(),
                    source.display()
                ));
            }

            let sink = TerminalSink::new();
            let report = organizer.execute_plan(
                &plan.source,
                plan.output.as_deref(),
                &plan.classifications,
                &sink,
            );
            sink.finish();

            if report.success && !keep_plan {
                if let Err(e) = OrganizationPlan::delete(&plan_path) {
                    OutputFormatter::error(&format!("Could not remove plan file: {}", e));
                }
            }
            finish_report(report.success, &report.message)
        }
    }
}

fn finish_report(success: bool, message: &str) -> Result<(), String> {
    if success {
        OutputFormatter::success(message);
        Ok(())
    } else {
        Err(message.to_string())
    }
}

fn effective_recursive(settings: &Settings, no_recurse: bool) -> bool {
    if no_recurse { false } else { settings.recursive }
}

fn merge_llm_settings(
    settings: &Settings,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
) -> LlmSettings {
    LlmSettings {
        base_url: base_url.unwrap_or_else(|| settings.llm.base_url.clone()),
        api_key: api_key.unwrap_or_else(|| settings.llm.api_key.clone()),
        model: model.unwrap_or_else(|| settings.llm.model.clone()),
    }
}

/// Compare two directory identities, tolerating `.`-style spelling
/// differences.
fn same_tree(a: &Path, b: &Path) -> bool {
    let canonical_a = std::fs::canonicalize(a).unwrap_or_else(|_| a.to_path_buf());
    let canonical_b = std::fs::canonicalize(b).unwrap_or_else(|_| b.to_path_buf());
    canonical_a == canonical_b
}
