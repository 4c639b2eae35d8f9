//! Default chat model configs loaded strictly from environment variables.
//!
//! Two roles are produced per provider:
//!
//! - **Fast** → used for classification, scoring and keyword extraction
//! - **Slow** → optional quality model; falls back to fast when unset
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`ollama` | `openai`), defaults to `ollama`
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64), defaults to 120
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = slow/quality model (mandatory)
//! - `OLLAMA_MODEL_FAST`           = fast model (optional, defaults to `OLLAMA_MODEL`)
//!
//! OpenAI:
//! - `OPENAI_URL`        = base URL, defaults to `https://api.openai.com`
//! - `OPENAI_API_KEY`    = API key (mandatory)
//! - `OPENAI_MODEL`      = slow/quality model (mandatory)
//! - `OPENAI_MODEL_FAST` = fast model (optional, defaults to `OPENAI_MODEL`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u32, env_opt_u64, must_env,
        validate_http_endpoint,
    },
};

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Fast and optional slow profile resolved from the environment.
#[derive(Debug, Clone)]
pub struct ProfileConfigs {
    pub fast: LlmModelConfig,
    pub slow: Option<LlmModelConfig>,
}

/// Resolves both profiles for the provider named in `LLM_KIND`.
///
/// # Errors
/// Any [`ConfigError`] raised while reading the provider-specific variables.
pub fn profiles_from_env() -> Result<ProfileConfigs, AiLlmError> {
    let provider = match env_opt("LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };

    match provider {
        LlmProvider::Ollama => Ok(ProfileConfigs {
            fast: config_ollama_fast()?,
            slow: Some(config_ollama_slow()?),
        }),
        LlmProvider::OpenAI => Ok(ProfileConfigs {
            fast: config_openai_fast()?,
            slow: Some(config_openai_slow()?),
        }),
    }
}

/// Resolves the Ollama endpoint from raw `OLLAMA_URL` / `OLLAMA_PORT` values.
///
/// Precedence:
/// 1. `url` if present and non-empty
/// 2. `port` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `port` is not a valid u16
pub fn ollama_endpoint_from(
    url: Option<&str>,
    port: Option<&str>,
) -> Result<String, AiLlmError> {
    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        validate_http_endpoint("OLLAMA_URL", url)?;
        return Ok(url.to_string());
    }
    if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

fn ollama_endpoint() -> Result<String, AiLlmError> {
    ollama_endpoint_from(
        env_opt("OLLAMA_URL").as_deref(),
        env_opt("OLLAMA_PORT").as_deref(),
    )
}

fn timeout_secs() -> Result<Option<u64>, AiLlmError> {
    Ok(Some(
        env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
    ))
}

/// Config for the **slow/quality** Ollama model (`OLLAMA_MODEL`).
///
/// # Defaults
/// - `temperature = Some(0.2)`
pub fn config_ollama_slow() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("OLLAMA_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Config for the **fast** Ollama model.
///
/// Classification answers are short and should be stable, so the fast
/// profile runs with a low temperature.
///
/// # Defaults
/// - `temperature = Some(0.1)`
/// - `top_p = Some(0.9)`
pub fn config_ollama_fast() -> Result<LlmModelConfig, AiLlmError> {
    let model = match env_opt("OLLAMA_MODEL_FAST") {
        Some(m) => m,
        None => must_env("OLLAMA_MODEL")?,
    };

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.1),
        top_p: Some(0.9),
        timeout_secs: timeout_secs()?,
    })
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// Config for the **slow/quality** OpenAI model (`OPENAI_MODEL`).
pub fn config_openai_slow() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: must_env("OPENAI_MODEL")?,
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Config for the **fast** OpenAI model (`OPENAI_MODEL_FAST`, falls back to `OPENAI_MODEL`).
pub fn config_openai_fast() -> Result<LlmModelConfig, AiLlmError> {
    let model = match env_opt("OPENAI_MODEL_FAST") {
        Some(m) => m,
        None => must_env("OPENAI_MODEL")?,
    };

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}
