//! Detection orchestrator: registry → prompt → model → extractor.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::{
    cancel::{CancelToken, WaitOutcome, cancellable_wait},
    config::DetectionConfig,
    error::DetectionError,
    extract::{extract_category_id, parse_confidence_score, parse_keywords},
    invoker::ModelInvoker,
    model::{CategoryId, ConfidenceScore, DetectionResult, KeywordSet},
    prompt::{build_classification_prompt, build_confidence_prompt, build_keyword_prompt},
    registry::CategoryRegistry,
};

/// Longest slice of a model answer echoed into logs.
const LOG_SNIPPET_CHARS: usize = 120;

/// Classifies user messages with a language model.
///
/// Cheap to share behind an `Arc`; holds no per-call state. Categories are
/// fetched fresh for every call and concurrent callers never share results.
pub struct CategoryDetector {
    registry: Arc<dyn CategoryRegistry>,
    invoker: Arc<dyn ModelInvoker>,
    config: DetectionConfig,
}

impl CategoryDetector {
    pub fn new(
        registry: Arc<dyn CategoryRegistry>,
        invoker: Arc<dyn ModelInvoker>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            registry,
            invoker,
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Single detection attempt.
    ///
    /// An empty or unreadable registry returns [`DetectionResult::NotDetected`]
    /// without calling the model. Model failures and unparsable answers do the same.
    #[instrument(skip_all, fields(message_len = user_message.len()))]
    pub async fn detect_category(&self, user_message: &str) -> DetectionResult {
        match self.try_detect(user_message).await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "category detection failed");
                DetectionResult::NotDetected
            }
        }
    }

    async fn try_detect(&self, user_message: &str) -> Result<DetectionResult, DetectionError> {
        let categories = self.registry.fetch_categories().await?;
        if categories.is_empty() {
            warn!("no categories available for detection");
            return Ok(DetectionResult::NotDetected);
        }

        let prompt = build_classification_prompt(&categories, user_message);
        let response = self.invoker.invoke(&prompt, user_message).await?;

        let result = DetectionResult::from(extract_category_id(&response, &categories));
        match result {
            DetectionResult::Detected(category_id) => info!(category_id, "category detected"),
            DetectionResult::NotDetected => warn!(
                response = %snippet(&response),
                "model answer names no known category"
            ),
        }
        Ok(result)
    }

    /// Up to `max_attempts` sequential attempts, returning on the first hit.
    ///
    /// Failed attempts are separated by the fixed `retry_delay`. Cancelling
    /// `cancel` during that pause ends the loop with `NotDetected`. An
    /// in-flight model call is always awaited. `max_attempts == 0` makes no call.
    #[instrument(skip(self, user_message, cancel), fields(message_len = user_message.len()))]
    pub async fn detect_category_with_retry(
        &self,
        user_message: &str,
        max_attempts: usize,
        cancel: &CancelToken,
    ) -> DetectionResult {
        for attempt in 1..=max_attempts {
            debug!(attempt, max_attempts, "detection attempt");

            let result = self.detect_category(user_message).await;
            if result.is_detected() {
                info!(attempt, max_attempts, "detection succeeded");
                return result;
            }

            if attempt < max_attempts
                && cancellable_wait(self.config.retry_delay, cancel).await == WaitOutcome::Cancelled
            {
                warn!(attempt, "detection retries cancelled");
                return DetectionResult::NotDetected;
            }
        }

        warn!(max_attempts, "category not detected after all attempts");
        DetectionResult::NotDetected
    }

    /// Scores how well `category_id` fits the message.
    ///
    /// Unknown category → [`ConfidenceScore::ZERO`] without a model call.
    /// Registry or model failure → [`ConfidenceScore::NEUTRAL`].
    #[instrument(skip(self, user_message), fields(message_len = user_message.len()))]
    pub async fn evaluate_confidence(
        &self,
        user_message: &str,
        category_id: CategoryId,
    ) -> ConfidenceScore {
        let category = match self.registry.fetch_category_by_id(category_id).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                warn!("category not found; confidence is zero");
                return ConfidenceScore::ZERO;
            }
            Err(err) => {
                error!(error = %err, "category lookup failed during confidence evaluation");
                return ConfidenceScore::NEUTRAL;
            }
        };

        let prompt = build_confidence_prompt(user_message, &category);
        match self.invoker.invoke(&prompt, user_message).await {
            Ok(response) => {
                let score = parse_confidence_score(&response);
                debug!(score = score.value(), "confidence evaluated");
                score
            }
            Err(err) => {
                error!(error = %err, "confidence evaluation failed");
                ConfidenceScore::NEUTRAL
            }
        }
    }

    /// Keywords of the message; empty on any failure.
    #[instrument(skip_all, fields(message_len = user_message.len()))]
    pub async fn extract_keywords(&self, user_message: &str) -> KeywordSet {
        let prompt = build_keyword_prompt(user_message);
        match self.invoker.invoke(&prompt, user_message).await {
            Ok(response) => {
                let keywords = parse_keywords(&response);
                debug!(count = keywords.len(), "keywords extracted");
                keywords
            }
            Err(err) => {
                error!(error = %err, "keyword extraction failed");
                Vec::new()
            }
        }
    }
}

fn snippet(text: &str) -> String {
    text.trim().chars().take(LOG_SNIPPET_CHARS).collect()
}
