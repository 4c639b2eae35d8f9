//! Internal failures of the detection pipeline.
//!
//! These never leave [`crate::CategoryDetector`]: each public operation turns
//! them into its fallback value. They are public so that registry and invoker
//! implementations can report failures.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionError {
    /// The category registry could not be read.
    #[error("category registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// The model call failed or timed out.
    #[error("model invocation failed: {0}")]
    Invocation(String),
}

impl From<AiLlmError> for DetectionError {
    fn from(err: AiLlmError) -> Self {
        DetectionError::Invocation(err.to_string())
    }
}
