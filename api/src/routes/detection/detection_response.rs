use category_detection::{CategoryId, DetectionResult, KeywordSet};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DetectCategoryResponse {
    pub category_id: Option<CategoryId>,
    pub detected: bool,
}

impl From<DetectionResult> for DetectCategoryResponse {
    fn from(r: DetectionResult) -> Self {
        Self {
            category_id: r.category_id(),
            detected: r.is_detected(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfidenceResponse {
    pub category_id: CategoryId,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: KeywordSet,
}
