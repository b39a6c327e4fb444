//! Rule-based classification.
//!
//! A rule assigns a category when a file's extension or name matches one of
//! its values. Rules are evaluated in declaration order and the first match
//! wins; there is no scoring. Evaluation is deterministic and side-effect
//! free, so the same filename against the same rule list always produces the
//! same category.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a rule's values are matched against a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Case-insensitive exact match against the file's extension.
    /// Values are normalized to start with `.` (`jpg` matches like `.jpg`).
    Extension,
    /// Case-insensitive substring match against the full filename,
    /// extension included.
    Keyword,
}

/// A user-defined classification rule.
///
/// `values` holds one or more match values separated by commas; each is
/// trimmed and lower-cased at evaluation time, and an empty value list never
/// matches anything. The engine never mutates rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Destination category name (non-empty).
    pub category: String,
    /// Extension or keyword matching.
    pub kind: MatchKind,
    /// Comma-separated match values, e.g. `"jpg, png"` or `"invoice,receipt"`.
    pub values: String,
}

impl ClassificationRule {
    pub fn new(category: impl Into<String>, kind: MatchKind, values: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            kind,
            values: values.into(),
        }
    }

    /// The normalized match values: trimmed, lower-cased, empties dropped.
    fn match_values(&self) -> impl Iterator<Item = String> + '_ {
        self.values
            .split(',')
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
    }

    /// Whether this rule matches the given filename.
    fn matches(&self, file_name: &str) -> bool {
        match self.kind {
            MatchKind::Extension => {
                let Some(ext) = Path::new(file_name)
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                else {
                    return false;
                };
                self.match_values().any(|v| {
                    let normalized = if v.starts_with('.') { v } else { format!(".{}", v) };
                    ext == normalized
                })
            }
            MatchKind::Keyword => {
                let name_lower = file_name.to_lowercase();
                self.match_values().any(|v| name_lower.contains(&v))
            }
        }
    }
}

/// Evaluate `rules` in order against `file_name`; first match wins.
///
/// Returns the matching rule's category, or `None` when nothing matched and
/// the file belongs in the unclassified folder.
pub fn classify<'a>(file_name: &str, rules: &'a [ClassificationRule]) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(file_name))
        .map(|rule| rule.category.as_str())
}

/// Parse a rule from the CLI form `Category=extension:jpg,png` or
/// `Category=keyword:invoice,receipt`.
pub fn parse_rule_spec(spec: &str) -> Result<ClassificationRule, String> {
    let (category, rest) = spec
        .split_once('=')
        .ok_or_else(|| format!("Rule '{}' is missing '=': expected Category=kind:values", spec))?;
    let (kind, values) = rest
        .split_once(':')
        .ok_or_else(|| format!("Rule '{}' is missing ':': expected Category=kind:values", spec))?;

    let category = category.trim();
    if category.is_empty() {
        return Err(format!("Rule '{}' has an empty category name", spec));
    }

    let kind = match kind.trim().to_lowercase().as_str() {
        "extension" | "ext" => MatchKind::Extension,
        "keyword" | "kw" => MatchKind::Keyword,
        other => {
            return Err(format!(
                "Rule '{}' has unknown match kind '{}': expected 'extension' or 'keyword'",
                spec, other
            ));
        }
    };

    Ok(ClassificationRule::new(category, kind, values.trim()))
}
