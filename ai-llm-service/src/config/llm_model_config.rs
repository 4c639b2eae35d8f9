use std::{fmt, time::Duration};

use crate::config::llm_provider::LlmProvider;

/// One chat profile: which backend, which model, and its sampling knobs.
///
/// Sampling fields left as `None` are omitted from the request so the
/// provider default applies.
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "qwen3:8b".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     max_tokens: Some(16),
///     temperature: Some(0.1),
///     top_p: None,
///     timeout_secs: Some(30),
/// };
/// assert_eq!(cfg.to_string(), "Ollama/qwen3:8b");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    /// e.g. `"gpt-4o-mini"` or `"qwen3:8b"`.
    pub model: String,
    /// Base URL without the API path.
    pub endpoint: String,
    /// Bearer token; OpenAI only.
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Per-request timeout, if the profile sets one.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl fmt::Display for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.provider, self.model)
    }
}
