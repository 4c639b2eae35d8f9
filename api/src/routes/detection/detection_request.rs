use category_detection::{CategoryId, DetectionConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DetectCategoryRequest {
    pub message: String,
    /// Defaults to the configured attempt count; negative values mean no
    /// attempt and large values are capped at the configured limit.
    #[serde(default)]
    pub max_attempts: Option<i64>,
}

impl DetectCategoryRequest {
    pub fn attempts(&self, cfg: &DetectionConfig) -> usize {
        cfg.attempts_for(self.max_attempts)
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfidenceRequest {
    pub message: String,
    pub category_id: CategoryId,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub message: String,
}
