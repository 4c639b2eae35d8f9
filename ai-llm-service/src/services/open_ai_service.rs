//! OpenAI-compatible chat client: `POST {endpoint}/v1/chat/completions`.

use std::time::Instant;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind},
    services::transport::{ChatTurn, Transport, turns},
};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug)]
pub struct OpenAiService {
    transport: Transport,
    cfg: LlmModelConfig,
}

impl OpenAiService {
    /// # Errors
    /// `MissingApiKey` without `cfg.api_key`; otherwise the same checks as the Ollama client.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let key = cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey))?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", key.trim())).map_err(|_| {
            ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::Decode("API key is not a valid header value".into()),
            )
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let transport = Transport::new(LlmProvider::OpenAI, &cfg, headers)?;
        Ok(Self { transport, cfg })
    }

    /// One non-streaming completion; returns the first choice that has content.
    #[instrument(skip_all, fields(profile = %self.cfg))]
    pub async fn chat(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = CompletionBody {
            model: &self.cfg.model,
            messages: turns(system, user),
            temperature: self.cfg.temperature,
            top_p: self.cfg.top_p,
            max_tokens: self.cfg.max_tokens,
        };

        let reply: CompletionReply = self.transport.post_json(COMPLETIONS_PATH, &body).await?;
        debug!(latency_ms = started.elapsed().as_millis(), "openai completion done");

        first_content(reply)
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::EmptyChoices).into())
    }
}

fn first_content(reply: CompletionReply) -> Option<String> {
    reply.choices.into_iter().find_map(|c| c.message.content)
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
