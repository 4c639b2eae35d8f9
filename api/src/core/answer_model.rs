use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use category_detection::{BoxFuture, DetectionError, ModelInvoker};

/// Routes chat answers to the slow profile; classification keeps using the fast one.
pub struct SlowProfile(pub Arc<LlmServiceProfiles>);

impl ModelInvoker for SlowProfile {
    fn invoke<'a>(
        &'a self,
        system_prompt: &'a str,
        user_text: &'a str,
    ) -> BoxFuture<'a, Result<String, DetectionError>> {
        Box::pin(async move {
            self.0
                .chat_slow(Some(system_prompt), user_text)
                .await
                .map_err(DetectionError::from)
        })
    }
}
