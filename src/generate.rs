use std::time::Duration;

use serde_json::json;
use thiserror::Error;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures at the generation boundary. None of these propagate past the
/// hint/word-supply layer; every caller resolves them to a fallback.
#[derive(Debug, Clone, Error)]
pub enum GenError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("empty response")]
    Empty,
}

/// Boundary to the external text-generation service. Implementations must be
/// shareable across the worker threads that dispatch requests.
pub trait TextModel: Send + Sync {
    /// One best-effort completion for `prompt`.
    fn complete(&self, prompt: &str) -> Result<String, GenError>;
}

/// Gemini-backed model. One `generateContent` call per completion, bounded by
/// a transport timeout; retries are the caller's business (there are none).
pub struct GeminiModel {
    agent: ureq::Agent,
    api_key: String,
}

impl GeminiModel {
    pub fn new(api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { agent, api_key }
    }

    /// Reads `GEMINI_API_KEY`; `None` disables generation for the session.
    pub fn from_env() -> Option<Self> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }
}

impl TextModel for GeminiModel {
    fn complete(&self, prompt: &str) -> Result<String, GenError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| GenError::Transport(e.to_string()))?;
        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| GenError::Malformed(e.to_string()))?;

        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GenError::Malformed("no text candidate".into()))?
            .trim();
        if text.is_empty() {
            return Err(GenError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Parses a word-list payload: a JSON array of strings, possibly wrapped in a
/// markdown code fence the model emitted despite instructions. Anything else
/// is treated like a transport failure.
pub fn parse_word_payload(text: &str) -> Result<Vec<String>, GenError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| GenError::Malformed(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| GenError::Malformed("expected a JSON array".into()))?;

    let mut words = Vec::with_capacity(items.len());
    for item in items {
        let word = item
            .as_str()
            .ok_or_else(|| GenError::Malformed("expected an array of strings".into()))?;
        let word = word.trim().to_uppercase();
        if !word.is_empty() {
            words.push(word);
        }
    }
    Ok(words)
}
