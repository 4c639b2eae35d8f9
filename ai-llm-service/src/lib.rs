//! Shared chat LLM service.
//!
//! - [`service_profiles::LlmServiceProfiles`]: fast/slow profiles over cached provider clients.
//! - [`services`]: thin Ollama and OpenAI chat clients.
//! - [`health_service`]: provider health probes for a `/health` endpoint.
//! - [`telemetry`]: library-scoped tracing layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
