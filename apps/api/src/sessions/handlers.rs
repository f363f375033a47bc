use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{MessageRow, SessionRow};
use crate::sessions::store;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionRow>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<MessageRow>,
}

#[derive(Deserialize)]
pub struct RenameSessionRequest {
    pub new_title: String,
}

/// POST /api/reset — deletes ALL sessions (and, via cascade, all messages).
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    store::delete_all_sessions(&state.db).await?;
    Ok(Json(json!({
        "status": "reset",
        "message": "All history cleared"
    })))
}

/// GET /api/sessions — newest first.
pub async fn handle_list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = store::list_sessions(&state.db).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// GET /api/history/:session_id
///
/// An unknown id returns an empty history rather than a 404; the web client
/// treats a fresh or deleted session the same as an empty one.
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = store::get_messages(&state.db, session_id, None).await?;
    Ok(Json(HistoryResponse { history }))
}

/// PUT /api/sessions/:session_id — 404 if the id is unknown.
pub async fn handle_rename(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<Value>, AppError> {
    store::rename_session(&state.db, session_id, &req.new_title).await?;
    Ok(Json(json!({
        "status": "success",
        "title": req.new_title
    })))
}

/// DELETE /api/sessions/:session_id — cascades to messages; 404 if unknown.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    store::delete_session(&state.db, session_id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Session deleted"
    })))
}
