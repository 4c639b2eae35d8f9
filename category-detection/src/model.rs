//! Ephemeral values produced by a single detection call.

use serde::{Deserialize, Serialize};

/// Category identifier as stored by the registry.
pub type CategoryId = i64;

/// Ordered keywords as returned by the model, duplicates retained.
pub type KeywordSet = Vec<String>;

/// A topical category a message can be classified into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Outcome of one detection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionResult {
    Detected(CategoryId),
    NotDetected,
}

impl DetectionResult {
    pub fn category_id(self) -> Option<CategoryId> {
        match self {
            Self::Detected(id) => Some(id),
            Self::NotDetected => None,
        }
    }

    pub fn is_detected(self) -> bool {
        matches!(self, Self::Detected(_))
    }
}

impl From<Option<CategoryId>> for DetectionResult {
    fn from(id: Option<CategoryId>) -> Self {
        id.map_or(Self::NotDetected, Self::Detected)
    }
}

/// How well a category matches a message, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Returned when the model answer carries no usable number or the call fails.
    pub const NEUTRAL: Self = Self(0.5);
    /// Returned when the category to score does not exist.
    pub const ZERO: Self = Self(0.0);

    /// Clamps a raw 0-100 score and scales it to `[0.0, 1.0]`.
    pub fn from_percent(raw: i64) -> Self {
        Self(raw.clamp(0, 100) as f64 / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}
