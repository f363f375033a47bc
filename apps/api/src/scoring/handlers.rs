use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidateRecord;
use crate::models::session::{MessageKind, MessageRole};
use crate::scoring::pipeline::{score_candidates, ResumeUpload};
use crate::sessions::{manager, store};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<CandidateRecord>,
    pub session_id: Uuid,
}

/// POST /api/analyze
///
/// Multipart form: `job_description` (text), optional `session_id` (text),
/// repeated `resumes` (PDF files). Persists the job description as a user
/// message and the ranked table as an assistant message in the resolved
/// session.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut job_description = String::new();
    let mut session_id: Option<String> = None;
    let mut uploads: Vec<ResumeUpload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "job_description" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
            }
            "session_id" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                if !raw.is_empty() {
                    session_id = Some(raw);
                }
            }
            "resumes" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                uploads.push(ResumeUpload { filename, bytes });
            }
            _ => {}
        }
    }

    if job_description.trim().is_empty() {
        return Err(AppError::Validation("No job description provided".into()));
    }
    if uploads.is_empty() {
        return Err(AppError::Validation("No resumes uploaded".into()));
    }

    let session =
        manager::resolve_or_create(&state.db, session_id.as_deref(), &job_description).await?;

    store::append_message(
        &state.db,
        session.id,
        MessageRole::User,
        MessageKind::Text,
        &Value::String(job_description.clone()),
    )
    .await?;

    info!(
        "Scoring {} resume(s) in session {}",
        uploads.len(),
        session.id
    );
    let results = score_candidates(state.llm.as_ref(), &job_description, &uploads).await;

    store::append_message(
        &state.db,
        session.id,
        MessageRole::Assistant,
        MessageKind::Table,
        &serde_json::to_value(&results).map_err(|e| AppError::Internal(e.into()))?,
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        results,
        session_id: session.id,
    }))
}
