//! Speech collaborators: speech-to-text and text-to-speech behind trait
//! seams, plus the degraded-mode wrappers the conversation flow relies on.
//!
//! Neither collaborator is allowed to fail a chat turn: a TTS failure means
//! "no audio, text only", an STT failure is surfaced as a tagged result so
//! callers can either show the failure or fold it into the transcript.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Bytes) -> Result<String, SpeechError>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Outcome of one transcription attempt. `Failed` carries the reason, not
/// a thrown error, because the interview must keep moving either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Recognized(String),
    Failed(String),
}

impl Transcription {
    pub fn recognized(&self) -> bool {
        matches!(self, Transcription::Recognized(_))
    }

    /// Collapses the tagged result into displayable text, preserving the
    /// historical "error string as transcript" degrade for callers that
    /// want it.
    pub fn display_text(self) -> String {
        match self {
            Transcription::Recognized(text) => text,
            Transcription::Failed(reason) => format!("Error transcribing: {reason}"),
        }
    }
}

/// Transcribes audio into a tagged result; never errors.
pub async fn transcribe_tagged(stt: &dyn SpeechToText, audio: Bytes) -> Transcription {
    match stt.transcribe(audio).await {
        Ok(text) => Transcription::Recognized(text.trim().to_string()),
        Err(e) => {
            warn!("STT failed: {e}");
            Transcription::Failed(e.to_string())
        }
    }
}

/// Synthesizes speech; `None` means "no audio available" and the caller
/// falls back to text-only presentation.
pub async fn synthesize_speech(tts: &dyn TextToSpeech, text: &str) -> Option<Vec<u8>> {
    match tts.synthesize(text).await {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("TTS failed: {e}");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct SttResponse {
    text: String,
}

/// HTTP speech-to-text client (Whisper-compatible transcription endpoint).
pub struct HttpSttClient {
    client: reqwest::Client,
    url: String,
}

impl HttpSttClient {
    pub fn new(url: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            url,
        })
    }
}

#[async_trait]
impl SpeechToText for HttpSttClient {
    async fn transcribe(&self, audio: Bytes) -> Result<String, SpeechError> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec()).file_name("audio.wav");
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: SttResponse = response.json().await?;
        Ok(body.text)
    }
}

/// HTTP text-to-speech client: JSON text in, raw audio bytes out.
pub struct HttpTtsClient {
    client: reqwest::Client,
    url: String,
}

impl HttpTtsClient {
    pub fn new(url: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            url,
        })
    }
}

#[async_trait]
impl TextToSpeech for HttpTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnreliableStt;

    #[async_trait]
    impl SpeechToText for UnreliableStt {
        async fn transcribe(&self, _audio: Bytes) -> Result<String, SpeechError> {
            Err(SpeechError::Api {
                status: 503,
                message: "model unavailable".to_string(),
            })
        }
    }

    struct EchoStt;

    #[async_trait]
    impl SpeechToText for EchoStt {
        async fn transcribe(&self, _audio: Bytes) -> Result<String, SpeechError> {
            Ok("  hello there  ".to_string())
        }
    }

    struct BrokenTts;

    #[async_trait]
    impl TextToSpeech for BrokenTts {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
            Err(SpeechError::Api {
                status: 500,
                message: "synth error".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn stt_failure_becomes_tagged_result_with_degrade_text() {
        let result = transcribe_tagged(&UnreliableStt, Bytes::from_static(b"wav")).await;
        assert!(!result.recognized());
        let text = result.display_text();
        assert!(text.starts_with("Error transcribing:"));
        assert!(text.contains("model unavailable"));
    }

    #[tokio::test]
    async fn successful_transcription_is_trimmed() {
        let result = transcribe_tagged(&EchoStt, Bytes::from_static(b"wav")).await;
        assert_eq!(result, Transcription::Recognized("hello there".to_string()));
    }

    #[tokio::test]
    async fn tts_failure_yields_none_not_error() {
        assert!(synthesize_speech(&BrokenTts, "hello").await.is_none());
    }
}
