//! Settings loading and the shared configuration snapshot.
//!
//! Settings are stored in TOML and looked up in this order:
//! 1. An explicitly provided path
//! 2. `.filesiftrc.toml` in the current directory
//! 3. `~/.config/filesift/config.toml`
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```toml
//! unclassified_folder = "Unclassified"
//! recursive = true
//! save_structure_snapshot = true
//!
//! [llm]
//! base_url = "https://dashscope.aliyuncs.com/compatible-mode/v1"
//! api_key = ""
//! model = "qwen-plus-latest"
//!
//! [ignore]
//! filenames = ["backup.old"]
//! patterns = ["*.partial"]
//! extensions = ["bak"]
//! regex = []
//! ```
//!
//! Running requests must observe a consistent snapshot even while the
//! configuration is being updated, so [`SharedSettings`] hands out
//! `Arc<Settings>` values and replaces the whole value on update rather than
//! mutating fields in place.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the ignore rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern in the ignore rules.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection settings for the remote classification service.
///
/// Any OpenAI-compatible chat completions endpoint works; the defaults point
/// at DashScope's compatibility mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_model() -> String {
    "qwen-plus-latest".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

/// User-supplied entries to skip in addition to the fixed reserved set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraIgnoreRules {
    /// Exact filenames to exclude (case-insensitive).
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.partial").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Top-level settings for the engine and CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder name that receives files no classifier could place.
    #[serde(default = "default_unclassified_folder")]
    pub unclassified_folder: String,

    /// Whether organization descends into subdirectories by default.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Whether a structure snapshot is written before a real run.
    #[serde(default = "default_save_structure_snapshot")]
    pub save_structure_snapshot: bool,

    /// Remote classification service connection.
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extra entries to skip during traversal.
    #[serde(default)]
    pub ignore: ExtraIgnoreRules,
}

fn default_unclassified_folder() -> String {
    "Unclassified".to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_save_structure_snapshot() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unclassified_folder: default_unclassified_folder(),
            recursive: default_recursive(),
            save_structure_snapshot: default_save_structure_snapshot(),
            llm: LlmSettings::default(),
            ignore: ExtraIgnoreRules::default(),
        }
    }
}

impl Settings {
    /// Load settings, with fallback to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if a configuration file is explicitly provided
    /// but cannot be read or parsed; missing implicit locations fall through
    /// to the next candidate.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".filesiftrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filesift")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::ConfigInvalid` if TOML parsing fails, and
    /// `ConfigError::IoError` if the file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

/// Process-wide settings handle with copy-on-write updates.
///
/// `snapshot` hands out the current `Arc<Settings>`; a request captures one
/// at start and keeps reading the same values for its whole lifetime no
/// matter what `replace` does concurrently.
pub struct SharedSettings {
    inner: RwLock<Arc<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(Arc::new(settings)),
        }
    }

    /// The current settings value. Cheap; clones only the `Arc`.
    pub fn snapshot(&self) -> Arc<Settings> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the whole settings value atomically.
    pub fn replace(&self, settings: Settings) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(settings);
    }
}
