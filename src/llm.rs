//! Remote classification over an OpenAI-compatible chat completions API.
//!
//! Two request shapes exist. Per-file classification asks for exactly one
//! category name out of an allowed list (or the literal `none` sentinel) and
//! is fail-soft: a service failure or an answer outside the allowed list
//! degrades to "unclassified" so one bad response never stalls a batch.
//! Suggestion mode asks for an initial set of category names from a sample
//! of filenames and is strict: without categories there is nothing to
//! organize, so a malformed payload is a hard error.
//!
//! The engine talks to the [`RemoteClassifier`] trait, not to the HTTP
//! client directly, so tests can substitute scripted implementations.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::config::LlmSettings;

/// Literal answer the model is instructed to give when no category fits.
pub const NONE_SENTINEL: &str = "none";

const CLASSIFY_TEMPERATURE: f32 = 0.3;
/// Category names are short; cap the classification answer accordingly.
const CLASSIFY_MAX_TOKENS: u32 = 50;
const SUGGEST_TEMPERATURE: f32 = 0.5;

/// Errors from the remote classification service.
#[derive(Debug)]
pub enum LlmError {
    /// Transport-level failure (connection, timeout, body decoding).
    Request(reqwest::Error),
    /// The service answered with a non-success status.
    Api { status: u16, body: String },
    /// The service answered but produced no usable content.
    EmptyResponse,
    /// Suggestion mode: the payload was not a JSON array of strings and
    /// contained no array-valued field to fall back on.
    InvalidSuggestionPayload(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Request(e) => write!(f, "LLM request failed: {}", e),
            LlmError::Api { status, body } => {
                write!(f, "LLM API error (status {}): {}", status, body)
            }
            LlmError::EmptyResponse => write!(f, "LLM returned empty content"),
            LlmError::InvalidSuggestionPayload(reason) => {
                write!(f, "Failed to parse LLM suggestions response: {}", reason)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// The external classification capability.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Classify one file into one of `categories`.
    ///
    /// `Ok(None)` means unclassified: either the model answered the `none`
    /// sentinel or its answer failed validation. `Err` is reserved for
    /// service failures; callers degrade those to unclassified as well.
    async fn classify(
        &self,
        file_name: &str,
        categories: &[String],
    ) -> Result<Option<String>, LlmError>;

    /// Propose category names from a sample of filenames.
    async fn suggest_categories(
        &self,
        samples: &[String],
        focus: Option<&str>,
        desired_count: Option<usize>,
    ) -> Result<Vec<String>, LlmError>;
}

/// HTTP-backed [`RemoteClassifier`].
pub struct LlmClient {
    http: Client,
    settings: LlmSettings,
}

impl LlmClient {
    /// Build a client for the given endpoint settings.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(LlmError::Request)?;
        Ok(Self { http, settings })
    }

    /// Send one chat completion request and return the first choice's text.
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(request)
            .send()
            .await
            .map_err(LlmError::Request)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await.map_err(LlmError::Request)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl RemoteClassifier for LlmClient {
    async fn classify(
        &self,
        file_name: &str,
        categories: &[String],
    ) -> Result<Option<String>, LlmError> {
        let (system, user) = classification_prompt(file_name, categories);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: Some(CLASSIFY_MAX_TOKENS),
            response_format: None,
        };
        let answer = self.chat(&request).await?;
        Ok(validate_classification(&answer, categories))
    }

    async fn suggest_categories(
        &self,
        samples: &[String],
        focus: Option<&str>,
        desired_count: Option<usize>,
    ) -> Result<Vec<String>, LlmError> {
        let (system, user) = suggestion_prompt(samples, focus, desired_count);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: SUGGEST_TEMPERATURE,
            max_tokens: None,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let content = self.chat(&request).await?;
        parse_suggestion_payload(&content)
    }
}

/// Build the two-message classification prompt.
///
/// The system message constrains the answer to exactly one allowed category
/// or the `none` sentinel; the user message carries the filename and the
/// allowed list.
pub fn classification_prompt(file_name: &str, categories: &[String]) -> (String, String) {
    let extension_hint = Path::new(file_name)
        .extension()
        .map(|e| format!(" (inferred file type: .{})", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    let system = format!(
        "You are a file classification assistant. Based on the file name{} and the given \
         category list, assign the file to the single most suitable category. If no category \
         fits, reply \"{}\". Reply with exactly one word: the category name or \"{}\".",
        extension_hint, NONE_SENTINEL, NONE_SENTINEL
    );
    let user = format!(
        "File name: \"{}\".\nChoose the most suitable category from the following list:\n{}\nIf no category fits, reply \"{}\".",
        file_name,
        categories.join("\n"),
        NONE_SENTINEL
    );
    (system, user)
}

/// Build the two-message suggestion prompt.
pub fn suggestion_prompt(
    samples: &[String],
    focus: Option<&str>,
    desired_count: Option<usize>,
) -> (String, String) {
    let system = "You are an assistant that generates folder category names for organizing \
                  files. Given sample file names and an optional classification focus, respond \
                  with a JSON array of category name strings."
        .to_string();
    let count_text = match desired_count {
        Some(n) => n.to_string(),
        None => "about 5-7".to_string(),
    };
    let user = format!(
        "Based on the following file name samples:\n\n{}\n\nConsidering the classification \
         focus (if provided): '{}', generate {} suitable folder category names.\n\nReturn the \
         result strictly as a JSON array of strings, for example: [\"Images\", \"Documents\", \
         \"Work Files\"]. Do not include any extra explanation or text, only the JSON array.",
        samples.join("\n"),
        focus.unwrap_or("no particular focus"),
        count_text
    );
    (system, user)
}

/// Validate a raw classification answer against the allowed list.
///
/// Trims whitespace, then: the `none` sentinel means unclassified; an exact
/// allowed-category match is accepted; anything else (hallucinated category,
/// extra prose) is treated as unclassified. No retries, no correction.
pub fn validate_classification(raw: &str, categories: &[String]) -> Option<String> {
    let answer = raw.trim();
    if answer == NONE_SENTINEL {
        return None;
    }
    categories.iter().find(|c| c.as_str() == answer).cloned()
}

/// Parse a suggestion payload into category names.
///
/// Expects a JSON array of strings. When the service wraps the array in an
/// object instead, the first array-valued field is used. Any other shape is
/// an error.
pub fn parse_suggestion_payload(content: &str) -> Result<Vec<String>, LlmError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| LlmError::InvalidSuggestionPayload(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, field)| match field {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                LlmError::InvalidSuggestionPayload(
                    "JSON object does not contain an array-valued field".to_string(),
                )
            })?,
        _ => {
            return Err(LlmError::InvalidSuggestionPayload(
                "payload is not an array or an object containing an array".to_string(),
            ));
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(LlmError::InvalidSuggestionPayload(format!(
                "array element is not a string: {}",
                other
            ))),
        })
        .collect()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
