use ai_llm_service::LlmServiceProfiles;

use crate::{error::DetectionError, registry::BoxFuture};

/// Opaque text-in/text-out model call.
///
/// A single call is atomic from the detector's point of view: it is awaited to
/// completion and never cancelled midway.
pub trait ModelInvoker: Send + Sync {
    fn invoke<'a>(
        &'a self,
        system_prompt: &'a str,
        user_text: &'a str,
    ) -> BoxFuture<'a, Result<String, DetectionError>>;
}

/// Classification runs on the fast profile.
impl ModelInvoker for LlmServiceProfiles {
    fn invoke<'a>(
        &'a self,
        system_prompt: &'a str,
        user_text: &'a str,
    ) -> BoxFuture<'a, Result<String, DetectionError>> {
        Box::pin(async move {
            self.chat_fast(Some(system_prompt), user_text)
                .await
                .map_err(DetectionError::from)
        })
    }
}
