pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::scheduling::handlers as scheduling;
use crate::scoring::handlers as scoring;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/reset", post(sessions::handle_reset))
        .route("/api/sessions", get(sessions::handle_list_sessions))
        .route(
            "/api/sessions/:session_id",
            put(sessions::handle_rename).delete(sessions::handle_delete),
        )
        .route("/api/history/:session_id", get(sessions::handle_history))
        // Scoring API
        .route("/api/analyze", post(scoring::handle_analyze))
        // Scheduling API
        .route("/api/schedule", post(scheduling::handle_schedule))
        // Interview API
        .route(
            "/api/interview/transcribe",
            post(interview::handle_transcribe),
        )
        .route("/api/interview/chat", post(interview::handle_chat))
        .with_state(state)
}
