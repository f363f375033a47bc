use axum::extract::{Multipart, State};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::engine::{build_history, next_question, HISTORY_WINDOW};
use crate::interview::speech::{synthesize_speech, transcribe_tagged};
use crate::llm_client::ChatTurn;
use crate::models::session::{MessageKind, MessageRole};
use crate::sessions::{manager, store};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub user_text: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub job_desc: String,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub ai_text: String,
    /// Base64-encoded audio, or null when synthesis failed and the client
    /// should fall back to text-only presentation.
    pub audio_base64: Option<String>,
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    /// False when the text is a transcription-failure notice rather than
    /// recognized speech.
    pub recognized: bool,
}

/// POST /api/interview/transcribe — side-effect free on the store.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, AppError> {
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            audio = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            );
        }
    }

    let audio = audio.ok_or_else(|| AppError::Validation("No audio uploaded".into()))?;

    let transcription = transcribe_tagged(state.stt.as_ref(), audio).await;
    let recognized = transcription.recognized();

    Ok(Json(TranscribeResponse {
        text: transcription.display_text(),
        recognized,
    }))
}

/// POST /api/interview/chat
///
/// One full interview turn: resolve the session, replay the windowed
/// history, persist the candidate's answer, generate and persist the next
/// question, synthesize speech. Both turns are written even when the model
/// degraded to the fallback question, so replay stays complete.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let title_hint = if req.user_text.trim().is_empty() {
        "Interview Session"
    } else {
        req.user_text.as_str()
    };
    let session = manager::resolve_or_create(&state.db, req.session_id.as_deref(), title_hint).await?;

    let recent = store::get_messages(&state.db, session.id, Some(HISTORY_WINDOW)).await?;
    let mut history = build_history(&recent);
    history.push(ChatTurn::user(req.user_text.clone()));

    store::append_message(
        &state.db,
        session.id,
        MessageRole::User,
        MessageKind::Text,
        &Value::String(req.user_text.clone()),
    )
    .await?;

    let ai_text = next_question(
        state.llm.as_ref(),
        &history,
        &req.resume_text,
        &req.job_desc,
    )
    .await;

    store::append_message(
        &state.db,
        session.id,
        MessageRole::Assistant,
        MessageKind::Text,
        &Value::String(ai_text.clone()),
    )
    .await?;

    let audio_base64 = synthesize_speech(state.tts.as_ref(), &ai_text)
        .await
        .map(|audio| base64::engine::general_purpose::STANDARD.encode(audio));

    Ok(Json(ChatResponse {
        ai_text,
        audio_base64,
        session_id: session.id,
    }))
}
