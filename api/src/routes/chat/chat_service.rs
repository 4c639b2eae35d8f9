//! One chat exchange: resolve category, store both messages, refresh the session.

use chrono::Utc;
use smart_search_store::{CategoryRecord, MessageType, NewChatMessage, SessionUpsert};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::{
        chat_request::ChatRequest, chat_response::ChatResponse, system_prompt::build_answer_prompt,
    },
};

/// Answers `req` and records the exchange.
///
/// Without a `category_id` the category is detected with retries; that wait
/// is cut short when the server shuts down.
#[instrument(skip_all, fields(user_id = %req.user_id))]
pub async fn process_chat(state: &AppState, req: ChatRequest) -> AppResult<ChatResponse> {
    req.validate()?;
    ensure_session_owner(state, &req).await?;

    let (category, auto_detected) = resolve_category(state, &req).await?;

    let context = state.store.context_for_category(category.category_id).await;
    let system_prompt = build_answer_prompt(&category.name, &context);

    info!(
        category_id = category.category_id,
        context_entries = context.len(),
        "calling answer model"
    );
    // Nothing is written until the answer exists, so a failed call leaves no trace.
    let answer = state
        .answer_model
        .invoke(&system_prompt, &req.message)
        .await
        .map_err(|e| AppError::LlmFailed(e.to_string()))?;

    let session_id = match req.existing_session() {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            info!(session_id = %id, "new chat session");
            id
        }
    };

    for (message_type, content) in [
        (MessageType::User, req.message.clone()),
        (MessageType::Ai, answer.clone()),
    ] {
        state
            .store
            .insert_message(NewChatMessage {
                session_id: session_id.clone(),
                user_id: req.user_id.clone(),
                category_id: category.category_id,
                message_type,
                content,
            })
            .await;
    }

    state
        .store
        .upsert_session(SessionUpsert {
            session_id: session_id.clone(),
            user_id: req.user_id,
            category_id: category.category_id,
            category_name: category.name,
        })
        .await;

    Ok(ChatResponse {
        session_id,
        ai_message: answer,
        category_id: category.category_id,
        auto_detected,
        timestamp: Utc::now(),
    })
}

/// Rejects a `session_id` that was opened by a different user.
async fn ensure_session_owner(state: &AppState, req: &ChatRequest) -> AppResult<()> {
    let Some(session_id) = req.existing_session() else {
        return Ok(());
    };
    match state.store.session_owner(session_id).await {
        Some(owner) if owner != req.user_id => {
            warn!(session_id, "session belongs to another user");
            Err(AppError::invalid_field(
                "session_id",
                "belongs to another user",
            ))
        }
        _ => Ok(()),
    }
}

async fn resolve_category(state: &AppState, req: &ChatRequest) -> AppResult<(CategoryRecord, bool)> {
    if let Some(id) = req.category_id {
        let category = state
            .store
            .category_by_id(id)
            .await
            .ok_or(AppError::InvalidCategory(id))?;
        return Ok((category, false));
    }

    let attempts = state.detector.config().default_max_attempts;
    let detected = state
        .detector
        .detect_category_with_retry(&req.message, attempts, &state.shutdown)
        .await;

    let Some(id) = detected.category_id() else {
        warn!(attempts, "no category detected for chat message");
        return Err(AppError::CategoryNotDetected);
    };

    // The category may have been deactivated between detection and lookup.
    let category = state
        .store
        .category_by_id(id)
        .await
        .ok_or(AppError::InvalidCategory(id))?;
    info!(category_id = id, "category auto-detected");
    Ok((category, true))
}
