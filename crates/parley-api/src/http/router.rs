//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS and request tracing. `/health` is public
//! on both routers.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::{AppState, EphemeralState};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Anonymous sessions kept in memory.
pub fn build_ephemeral_router(state: EphemeralState) -> Router {
    Router::new()
        .route("/session", get(handlers::session::open_session))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/history/{session_id}",
            get(handlers::history::session_history),
        )
        .route("/health", get(health_check))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Registered users with SQLite-backed conversations.
pub fn build_persistent_router(state: AppState) -> Router {
    Router::new()
        // Accounts
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        // Conversations
        .route(
            "/session",
            get(handlers::session::create_session).post(handlers::session::create_titled_session),
        )
        .route("/chat", post(handlers::chat::chat_authenticated))
        .route("/history/{id}", get(handlers::history::history))
        .route(
            "/conversation/{session_id}",
            get(handlers::conversation::get_conversation)
                .put(handlers::conversation::rename_conversation),
        )
        .route("/health", get(health_check))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
