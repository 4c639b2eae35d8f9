use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api::{BASE_PATH, build_router, core::app_state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use category_detection::{BoxFuture, DetectionConfig, DetectionError, ModelInvoker};
use serde_json::{Value, json};
use smart_search_store::{CategoryRecord, MemoryStore};
use tower::ServiceExt;

/// Answers by prompt kind, so one fake serves detection and chat alike.
struct PromptRouter {
    classification: String,
    answer: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl PromptRouter {
    fn new(classification: &str, answer: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            classification: classification.into(),
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ModelInvoker for PromptRouter {
    fn invoke<'a>(
        &'a self,
        system_prompt: &'a str,
        _user_text: &'a str,
    ) -> BoxFuture<'a, Result<String, DetectionError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(system_prompt.to_string());

        let out = if system_prompt.contains("Available categories") {
            Ok(self.classification.clone())
        } else if system_prompt.contains("Scoring bands") {
            Ok("85".to_string())
        } else if system_prompt.contains("Extract the key terms") {
            Ok("Jenkins, Docker, x".to_string())
        } else {
            self.answer
                .clone()
                .ok_or_else(|| DetectionError::Invocation("upstream 503".into()))
        };
        Box::pin(async move { out })
    }
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for (id, name, order) in [(1, "Deploy", 2), (2, "Network", 1)] {
        store
            .add_category(CategoryRecord {
                category_id: id,
                name: name.into(),
                description: format!("{name} questions"),
                icon: None,
                sort_order: order,
                active: true,
            })
            .await;
    }
    store.add_context(1, "Deployments run through Jenkins").await;
    Arc::new(store)
}

async fn app(model: Arc<PromptRouter>) -> (Router, Arc<MemoryStore>) {
    let store = seeded_store().await;
    let detection = DetectionConfig {
        retry_delay: Duration::from_millis(1),
        default_max_attempts: 2,
        max_attempts_limit: 4,
    };
    let state = AppState::new(store.clone(), model.clone(), model, detection);
    (build_router(Arc::new(state)), store)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(format!("{BASE_PATH}{path}"));
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn categories_in_display_order() {
    let (app, _) = app(PromptRouter::new("1", Some("ok"))).await;

    let (status, body) = send(&app, "GET", "/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["name"], "Network");
    assert_eq!(body["data"][1]["category_id"], 1);
}

#[tokio::test]
async fn chat_with_explicit_category_stores_exchange() {
    let model = PromptRouter::new("NONE", Some("Jenkins 로그를 확인하세요."));
    let (app, store) = app(model.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 1, "message": "배포가 실패해요", "user_id": "u1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["ai_message"], "Jenkins 로그를 확인하세요.");
    assert_eq!(data["category_id"], 1);
    assert_eq!(data["auto_detected"], false);

    let session_id = data["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 36);
    assert!(store.session_exists(session_id).await);
    assert_eq!(store.messages_for_session(session_id).await.len(), 2);

    // Only the answer call; no detection happened.
    assert_eq!(model.calls(), 1);
    assert!(model.prompts()[0].contains("- Deployments run through Jenkins"));
}

#[tokio::test]
async fn chat_detects_missing_category() {
    let model = PromptRouter::new("카테고리는 2번입니다", Some("VPN을 재시작하세요."));
    let (app, _) = app(model.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "message": "VPN이 끊겨요", "user_id": "u1", "session_id": "s-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category_id"], 2);
    assert_eq!(body["data"]["auto_detected"], true);
    assert_eq!(body["data"]["session_id"], "s-1");
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn chat_without_detectable_category_is_422() {
    let model = PromptRouter::new("NONE", Some("unused"));
    let (app, store) = app(model.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "message": "날씨 어때?", "user_id": "u1", "session_id": "s-9" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "CATEGORY_NOT_DETECTED");
    // Two detection attempts, no answer call, nothing stored.
    assert_eq!(model.calls(), 2);
    assert!(store.messages_for_session("s-9").await.is_empty());
}

#[tokio::test]
async fn chat_rejects_bad_input() {
    let (app, _) = app(PromptRouter::new("1", Some("ok"))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 99, "message": "hi", "user_id": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_CATEGORY");

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 1, "message": "   ", "user_id": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["path"], "message");
}

#[tokio::test]
async fn chat_answer_failure_is_502_and_stores_nothing() {
    let (app, store) = app(PromptRouter::new("1", None)).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 1, "message": "hi", "user_id": "u1", "session_id": "s-x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "LLM_FAILED");
    assert!(store.messages_for_session("s-x").await.is_empty());
    assert!(!store.session_exists("s-x").await);
    assert!(store.chat_history("u1", None, 0, 20).await.is_empty());
}

#[tokio::test]
async fn chat_refuses_session_of_another_user() {
    let model = PromptRouter::new("1", Some("ok"));
    let (app, store) = app(model.clone()).await;
    let (status, _) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 1, "message": "q", "user_id": "alice", "session_id": "s-a" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let calls = model.calls();

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({ "category_id": 1, "message": "q", "user_id": "mallory", "session_id": "s-a" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["path"], "session_id");
    assert_eq!(model.calls(), calls);
    assert_eq!(store.messages_for_session("s-a").await.len(), 2);
    assert_eq!(store.session_owner("s-a").await.as_deref(), Some("alice"));
}

#[tokio::test]
async fn malformed_body_is_wrapped_in_envelope() {
    let (app, _) = app(PromptRouter::new("1", Some("ok"))).await;

    let (status, body) = send(&app, "POST", "/chat", Some(json!({ "message": "hi" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn history_lists_sessions() {
    let (app, _) = app(PromptRouter::new("1", Some("answer"))).await;
    for session in ["a", "b"] {
        let (status, _) = send(
            &app,
            "POST",
            "/chat",
            Some(json!({ "category_id": 1, "message": "q", "user_id": "u1", "session_id": session })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/history?user_id=u1&size=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["session_id"], "b");
    assert_eq!(page[0]["message_count"], 2);
    assert_eq!(page[0]["last_message"], "answer");

    let (_, body) = send(&app, "GET", "/history?user_id=u1&category_id=2", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn feedback_is_created() {
    let (app, store) = app(PromptRouter::new("1", Some("ok"))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "session_id": "s1", "user_id": "u1", "rating": 5, "comment": "좋아요" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["feedback_id"], 1);
    assert_eq!(store.feedback_for_session("s1").await.len(), 1);

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "session_id": "s1", "user_id": "u1", "rating": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["path"], "rating");
}

#[tokio::test]
async fn detection_endpoints() {
    let model = PromptRouter::new("Network", Some("ok"));
    let (app, _) = app(model.clone()).await;

    let (_, body) = send(&app, "POST", "/detect-category", Some(json!({ "message": "vpn" }))).await;
    assert_eq!(body["data"], json!({ "category_id": 2, "detected": true }));

    let before = model.calls();
    let (_, body) = send(
        &app,
        "POST",
        "/detect-category",
        Some(json!({ "message": "vpn", "max_attempts": -1 })),
    )
    .await;
    assert_eq!(body["data"]["detected"], false);
    assert_eq!(model.calls(), before);

    let (_, body) = send(
        &app,
        "POST",
        "/confidence",
        Some(json!({ "message": "vpn", "category_id": 2 })),
    )
    .await;
    assert_eq!(body["data"]["score"], 0.85);

    let (_, body) = send(
        &app,
        "POST",
        "/confidence",
        Some(json!({ "message": "vpn", "category_id": 77 })),
    )
    .await;
    assert_eq!(body["data"]["score"], 0.0);

    let (_, body) = send(&app, "POST", "/keywords", Some(json!({ "message": "ci" }))).await;
    assert_eq!(body["data"]["keywords"], json!(["Jenkins", "Docker"]));
}

#[tokio::test]
async fn detect_category_caps_requested_attempts() {
    let model = PromptRouter::new("NONE", Some("ok"));
    let (app, _) = app(model.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/detect-category",
        Some(json!({ "message": "vpn", "max_attempts": 1_000_000 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["detected"], false);
    assert_eq!(model.calls(), 4);
}

#[tokio::test]
async fn health_without_llm_profiles() {
    let (app, _) = app(PromptRouter::new("1", Some("ok"))).await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["llm"], json!([]));
}
