//! Router tests for the anonymous in-memory deployment.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{ScriptedProvider, send};
use parley_api::http::router::build_ephemeral_router;
use parley_api::state::EphemeralState;
use parley_types::config::ServerConfig;

fn router(provider: &ScriptedProvider) -> axum::Router {
    build_ephemeral_router(EphemeralState::new(
        provider.boxed(),
        &ServerConfig::default(),
    ))
}

async fn new_session(router: &axum::Router) -> String {
    let (status, body) = send(router, "GET", "/session", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn new_session_has_empty_history() {
    let provider = ScriptedProvider::default();
    let app = router(&provider);
    let session_id = new_session(&app).await;

    let (status, body) = send(&app, "GET", &format!("/history/{session_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], session_id);
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn chat_on_unknown_session_is_400_and_skips_model() {
    let provider = ScriptedProvider::default();
    let app = router(&provider);

    for session_id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let (status, body) = send(
            &app,
            "POST",
            "/chat",
            None,
            Some(json!({"sessionId": session_id, "message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid session");
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn sequential_chats_keep_request_order() {
    let provider = ScriptedProvider::default();
    let app = router(&provider);
    let session_id = new_session(&app).await;

    for message in ["first question", "second question"] {
        let (status, body) = send(
            &app,
            "POST",
            "/chat",
            None,
            Some(json!({"sessionId": session_id, "message": message})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], format!("echo: {message}"));
    }

    let (_, body) = send(&app, "GET", &format!("/history/{session_id}"), None, None).await;
    assert_eq!(
        body["history"],
        json!([
            {"role": "human", "content": "first question"},
            {"role": "ai", "content": "echo: first question"},
            {"role": "human", "content": "second question"},
            {"role": "ai", "content": "echo: second question"},
        ])
    );
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn history_of_unknown_session_is_404() {
    let app = router(&ScriptedProvider::default());
    let (status, body) = send(
        &app,
        "GET",
        &format!("/history/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn provider_failure_is_502_and_leaves_history_untouched() {
    let provider = ScriptedProvider::failing();
    let app = router(&provider);
    let session_id = new_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        None,
        Some(json!({"sessionId": session_id, "message": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");

    let (_, body) = send(&app, "GET", &format!("/history/{session_id}"), None, None).await;
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let provider = ScriptedProvider::default();
    let app = router(&provider);
    let session_id = new_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        None,
        Some(json!({"sessionId": session_id, "message": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(&ScriptedProvider::default());
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
