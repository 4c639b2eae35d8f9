//! Shared chat LLM service with two profiles: `fast` and `slow`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+timeout).
//! - If the `slow` profile is not provided, it falls back to `fast`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmModelConfig, LlmProvider, LlmServiceProfiles};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fast = LlmModelConfig {
//!         provider: LlmProvider::Ollama,
//!         model: "qwen3:14b".into(),
//!         endpoint: "http://localhost:11434".into(),
//!         api_key: None,
//!         max_tokens: Some(512),
//!         temperature: Some(0.1),
//!         top_p: Some(0.9),
//!         timeout_secs: Some(30),
//!     };
//!
//!     let svc = Arc::new(LlmServiceProfiles::new(fast, None, Some(10))?);
//!     let txt = svc.chat_fast(Some("Reply with one word."), "Hello").await?;
//!     println!("FAST: {txt}");
//!     Ok(())
//! }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{
        default_config::{ProfileConfigs, profiles_from_env},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service managing the **fast** and **slow** chat profiles.
pub struct LlmServiceProfiles {
    fast: LlmModelConfig,
    slow: LlmModelConfig,

    ollama: ClientCache<OllamaService>,
    openai: ClientCache<OpenAiService>,

    health: HealthService,
}

impl std::fmt::Debug for LlmServiceProfiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmServiceProfiles")
            .field("fast", &self.fast.model)
            .field("slow", &self.slow.model)
            .finish()
    }
}

impl LlmServiceProfiles {
    /// Creates a new service.
    ///
    /// - `fast`: required fast profile.
    /// - `slow_opt`: optional slow profile. If `None`, falls back to `fast`.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        fast: LlmModelConfig,
        slow_opt: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let slow = slow_opt.unwrap_or_else(|| fast.clone());

        Ok(Self {
            fast,
            slow,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds the service from `LLM_KIND` and the provider variables.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let ProfileConfigs { fast, slow } = profiles_from_env()?;
        Self::new(fast, slow, Some(10))
    }

    /// Chat using the **fast** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails.
    pub async fn chat_fast(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        self.chat_with(&self.fast, system, user).await
    }

    /// Chat using the **slow** profile (falls back to fast when not configured).
    pub async fn chat_slow(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        self.chat_with(&self.slow, system, user).await
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![self.fast.clone()];
        if self.slow != self.fast {
            list.push(self.slow.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(fast, slow)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.fast, &self.slow)
    }

    async fn chat_with(
        &self,
        cfg: &LlmModelConfig,
        system: Option<&str>,
        user: &str,
    ) -> Result<String, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => {
                let cli = cached(&self.ollama, cfg, OllamaService::new).await?;
                cli.chat(system, user).await
            }
            LlmProvider::OpenAI => {
                let cli = cached(&self.openai, cfg, OpenAiService::new).await?;
                cli.chat(system, user).await
            }
        }
    }
}

type ClientCache<C> = RwLock<HashMap<ClientKey, Arc<C>>>;

/// Returns the client for `cfg`, building it with `build` on first use.
async fn cached<C>(
    cache: &ClientCache<C>,
    cfg: &LlmModelConfig,
    build: fn(LlmModelConfig) -> Result<C, AiLlmError>,
) -> Result<Arc<C>, AiLlmError> {
    let key = ClientKey::from(cfg);
    if let Some(cli) = cache.read().await.get(&key) {
        return Ok(cli.clone());
    }
    let mut w = cache.write().await;
    if let Some(cli) = w.get(&key) {
        return Ok(cli.clone());
    }
    let cli = Arc::new(build(cfg.clone())?);
    w.insert(key, cli.clone());
    debug!(profile = %cfg, "provider client created");
    Ok(cli)
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:8b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.1),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn slow_falls_back_to_fast() {
        let svc = LlmServiceProfiles::new(fast(), None, Some(1)).unwrap();
        let (f, s) = svc.profiles();
        assert_eq!(f, s);
    }

    #[tokio::test]
    async fn client_is_cached_per_config() {
        let svc = LlmServiceProfiles::new(fast(), None, Some(1)).unwrap();
        let a = cached(&svc.ollama, &svc.fast, OllamaService::new).await.unwrap();
        let b = cached(&svc.ollama, &svc.slow, OllamaService::new).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn invalid_endpoint_surfaces_as_error() {
        let mut cfg = fast();
        cfg.endpoint = "localhost:11434".into();
        let svc = LlmServiceProfiles::new(cfg, None, Some(1)).unwrap();
        assert!(svc.chat_fast(None, "hi").await.is_err());
    }
}
