//! filesift - organize files into category subfolders.
//!
//! This library classifies files by user-defined rules (extension or keyword
//! matches) or by delegating the decision to an OpenAI-compatible LLM, then
//! moves them into category directories without ever overwriting an existing
//! file. Dry runs report every planned move and cache their classification
//! decisions so the matching real run replays them for free.

pub mod cache;
pub mod cli;
pub mod config;
pub mod ignore;
pub mod llm;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod plan;
pub mod progress;
pub mod rules;
pub mod snapshot;
pub mod walker;

pub use config::{ConfigError, Settings, SharedSettings};
pub use llm::{LlmClient, RemoteClassifier};
pub use organizer::{
    ExecutionReport, FileClassification, LlmOrganizeRequest, ManualOrganizeRequest,
    OrganizationPreview, Organizer, PreviewRequest, SuggestRequest,
};
pub use plan::OrganizationPlan;
pub use progress::{LogLevel, NullSink, ProgressEvent, ProgressSink, ProgressSinkExt};
pub use rules::{ClassificationRule, MatchKind};
