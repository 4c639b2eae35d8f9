use std::{env, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use category_detection::{CancelToken, CategoryDetector, DetectionConfig, ModelInvoker};
use smart_search_store::MemoryStore;
use tracing::{info, warn};

use crate::{core::answer_model::SlowProfile, error_handler::AppError};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub detector: CategoryDetector,
    /// Model that writes the chat answers.
    pub answer_model: Arc<dyn ModelInvoker>,
    /// Concrete LLM profiles, present when running against real providers; used by `/health`.
    pub llm: Option<Arc<LlmServiceProfiles>>,
    /// Cancelled on shutdown; aborts detection retries that are waiting.
    pub shutdown: CancelToken,
}

impl AppState {
    /// `detection_model` classifies messages; `answer_model` writes chat replies.
    pub fn new(
        store: Arc<MemoryStore>,
        detection_model: Arc<dyn ModelInvoker>,
        answer_model: Arc<dyn ModelInvoker>,
        detection: DetectionConfig,
    ) -> Self {
        let detector = CategoryDetector::new(store.clone(), detection_model, detection);
        Self {
            store,
            detector,
            answer_model,
            llm: None,
            shutdown: CancelToken::new(),
        }
    }

    pub fn with_llm_profiles(mut self, llm: Arc<LlmServiceProfiles>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Build state from environment variables.
    ///
    /// `SMART_SEARCH_SEED` points at an optional JSON seed for the store.
    pub async fn from_env() -> Result<Self, AppError> {
        let store = match env::var("SMART_SEARCH_SEED") {
            Ok(path) if !path.trim().is_empty() => MemoryStore::from_seed_file(path.trim()).await?,
            _ => {
                warn!("SMART_SEARCH_SEED not set; starting with an empty category list");
                MemoryStore::new()
            }
        };

        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let detection = DetectionConfig::from_env();
        info!(
            retry_delay_ms = detection.retry_delay.as_millis() as u64,
            max_attempts = detection.default_max_attempts,
            "detection configured"
        );

        let answer = Arc::new(SlowProfile(llm.clone()));
        Ok(Self::new(Arc::new(store), llm.clone(), answer, detection).with_llm_profiles(llm))
    }
}
