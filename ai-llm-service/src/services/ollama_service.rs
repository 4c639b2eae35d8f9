//! Ollama chat client: `POST {endpoint}/api/chat` with `stream=false`.
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = OllamaService::new(LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "qwen3:8b".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: Some(16),
//!     temperature: Some(0.0),
//!     top_p: None,
//!     timeout_secs: Some(30),
//! })?;
//! let id = svc.chat(Some("Reply with a category id or NONE."), "VPN is down").await?;
//! # Ok(()) }
//! ```

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind},
    services::transport::{ChatTurn, Transport, turns},
};

const CHAT_PATH: &str = "/api/chat";

#[derive(Debug)]
pub struct OllamaService {
    transport: Transport,
    cfg: LlmModelConfig,
}

impl OllamaService {
    /// # Errors
    /// `InvalidProvider` / `InvalidEndpoint` for a config that does not target
    /// Ollama over http(s); [`AiLlmError::HttpTransport`] if the client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let transport = Transport::new(LlmProvider::Ollama, &cfg, HeaderMap::new())?;
        Ok(Self { transport, cfg })
    }

    /// One non-streaming exchange. `max_tokens` maps to Ollama's `num_predict`.
    #[instrument(skip_all, fields(profile = %self.cfg))]
    pub async fn chat(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = OllamaChatBody::new(&self.cfg, system, user);

        let reply: OllamaChatReply = self.transport.post_json(CHAT_PATH, &body).await?;
        debug!(latency_ms = started.elapsed().as_millis(), "ollama chat done");

        reply
            .message
            .map(|m| m.content)
            .ok_or_else(|| ProviderError::new(Provider::Ollama, ProviderErrorKind::EmptyChoices).into())
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    stream: bool,
    options: SamplingOptions,
}

impl<'a> OllamaChatBody<'a> {
    fn new(cfg: &'a LlmModelConfig, system: Option<&'a str>, user: &'a str) -> Self {
        Self {
            model: &cfg.model,
            messages: turns(system, user),
            stream: false,
            options: SamplingOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatReply {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}
