//! Health probes for chat LLM backends (Ollama, OpenAI).
//!
//! - Ollama: `GET {endpoint}/api/tags`, model looked up in `models[].name`
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, model looked up in `data[].id`
//!
//! [`HealthService::check`] never fails; errors are mapped to `ok=false`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
struct OllamaTags {
    models: Option<Vec<OllamaTag>>,
}

#[derive(Deserialize)]
struct OllamaTag {
    name: String,
}

#[derive(Deserialize)]
struct OpenAiModels {
    data: Vec<OpenAiModel>,
}

#[derive(Deserialize)]
struct OpenAiModel {
    id: String,
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks a single config. Resilient: failures become `ok = false`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        match self.probe(cfg).await {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Checks several configs sequentially.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn probe(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let base = cfg.endpoint.trim().trim_end_matches('/');
        let timeout = cfg
            .timeout()
            .map_or(self.default_timeout, |t| t.min(self.default_timeout));

        let (url, auth) = match cfg.provider {
            LlmProvider::Ollama => (format!("{base}/api/tags"), None),
            LlmProvider::OpenAI => {
                let key = cfg
                    .api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(HealthError::MissingApiKey)?;
                let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|e| HealthError::InvalidApiKey(e.to_string()))?;
                (format!("{base}/v1/models"), Some(value))
            }
        };

        debug!(provider = ?cfg.provider, "GET {}", url);
        let start = Instant::now();
        let mut req = self.client.get(&url).timeout(timeout);
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = req.send().await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let body = resp.text().await?;
        let listed = model_listed(cfg.provider, &body, &cfg.model);
        Ok(match listed {
            Some(true) => HealthStatus::new(cfg, true, latency, "reachable; model is available"),
            Some(false) => HealthStatus::new(cfg, false, latency, "reachable, but model not listed"),
            None => HealthStatus::new(cfg, true, latency, "reachable; model list not decodable"),
        })
    }
}

/// Looks `model` up in a provider model listing. `None` if the body cannot be decoded.
fn model_listed(provider: LlmProvider, body: &str, model: &str) -> Option<bool> {
    match provider {
        LlmProvider::Ollama => serde_json::from_str::<OllamaTags>(body)
            .ok()
            .and_then(|t| t.models)
            .map(|models| models.iter().any(|m| m.name == model)),
        LlmProvider::OpenAI => serde_json::from_str::<OpenAiModels>(body)
            .ok()
            .map(|m| m.data.iter().any(|m| m.id == model)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai(api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: api_key.map(str::to_string),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn openai_key_problems_have_their_own_errors() {
        let svc = HealthService::new(Some(1)).unwrap();

        for key in [None, Some("   ")] {
            assert!(matches!(
                svc.probe(&openai(key)).await,
                Err(AiLlmError::Health(HealthError::MissingApiKey))
            ));
        }
        assert!(matches!(
            svc.probe(&openai(Some("sk-\nbad"))).await,
            Err(AiLlmError::Health(HealthError::InvalidApiKey(_)))
        ));

        let status = svc.check(&openai(None)).await;
        assert!(!status.ok);
        assert!(status.message.contains("missing API key"));
    }

    #[test]
    fn finds_ollama_model_in_tags() {
        let body = r#"{"models":[{"name":"llama3:8b"},{"name":"qwen3:14b"}]}"#;
        assert_eq!(model_listed(LlmProvider::Ollama, body, "qwen3:14b"), Some(true));
        assert_eq!(model_listed(LlmProvider::Ollama, body, "mistral"), Some(false));
    }

    #[test]
    fn finds_openai_model_in_list() {
        let body = r#"{"data":[{"id":"gpt-4o-mini"}]}"#;
        assert_eq!(model_listed(LlmProvider::OpenAI, body, "gpt-4o-mini"), Some(true));
    }

    #[test]
    fn undecodable_listing_is_unknown() {
        assert_eq!(model_listed(LlmProvider::OpenAI, "<html>", "x"), None);
        assert_eq!(model_listed(LlmProvider::Ollama, "{}", "x"), None);
    }
}
