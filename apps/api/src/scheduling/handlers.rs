use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::candidate::ScheduleLogEntry;
use crate::scheduling::pipeline::{schedule_interviews, ScheduleCandidate};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub candidates: Vec<ScheduleCandidate>,
    /// RFC 3339; defaults to the time of the call.
    pub start_time: Option<DateTime<Utc>>,
    pub meeting_link: Option<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub logs: Vec<ScheduleLogEntry>,
}

/// POST /api/schedule — not tied to a session; the log is the only output.
pub async fn handle_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let start_time = req.start_time.unwrap_or_else(Utc::now);

    let logs = schedule_interviews(
        state.mailer.as_ref(),
        &req.candidates,
        start_time,
        req.meeting_link.as_deref(),
        state.config.failed_send_policy,
    )
    .await;

    Ok(Json(ScheduleResponse { logs }))
}
