use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::interview::speech::{SpeechToText, TextToSpeech};
use crate::llm_client::ChatModel;
use crate::scheduling::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum
/// extractors. Collaborator clients are constructed once at startup and
/// shared process-wide behind their trait seams.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn ChatModel>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
