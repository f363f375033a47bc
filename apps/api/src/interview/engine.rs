//! Turn-based interview question generation.
//!
//! The engine reads back a bounded window of stored history, appends the
//! candidate's latest answer, and asks the model for the next question.
//! Conversation continuity wins over error transparency: a failed model
//! call produces a fixed fallback question, never an error to the caller.

use tracing::warn;

use crate::interview::prompts::interviewer_system_prompt;
use crate::llm_client::{ChatModel, ChatTurn};
use crate::models::session::MessageRow;

/// How many stored messages are replayed into the model's context. Older
/// turns stay durable but drop out of the prompt.
pub const HISTORY_WINDOW: i64 = 10;

/// Non-zero temperature: question variety is desired here, unlike scoring.
const INTERVIEW_TEMPERATURE: f32 = 0.7;

const FALLBACK_QUESTION: &str =
    "Let's move to the next topic. Can you tell me about your strengths?";

/// Rebuilds conversation turns from stored messages: text kinds only, in
/// the order given (callers pass chronological history).
pub fn build_history(messages: &[MessageRow]) -> Vec<ChatTurn> {
    messages
        .iter()
        .filter(|m| m.is_text())
        .map(|m| {
            let content = m.text_content();
            if m.is_assistant() {
                ChatTurn::assistant(content)
            } else {
                ChatTurn::user(content)
            }
        })
        .collect()
}

/// Asks the model for the next interview question given the windowed
/// history. The last turn in `history` is the candidate's latest answer.
pub async fn next_question(
    model: &dyn ChatModel,
    history: &[ChatTurn],
    resume_text: &str,
    job_desc: &str,
) -> String {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(ChatTurn::system(interviewer_system_prompt(
        job_desc,
        resume_text,
    )));
    turns.extend_from_slice(history);

    match model.complete(&turns, INTERVIEW_TEMPERATURE).await {
        Ok(question) => question,
        Err(e) => {
            warn!("Interview model call failed, using fallback question: {e}");
            FALLBACK_QUESTION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{LlmError, TurnRole};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{json, Value};
    use uuid::Uuid;

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn complete(
            &self,
            _turns: &[ChatTurn],
            _temperature: f32,
        ) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    struct CapturingModel {
        captured: std::sync::Mutex<Vec<ChatTurn>>,
    }

    #[async_trait]
    impl ChatModel for CapturingModel {
        async fn complete(
            &self,
            turns: &[ChatTurn],
            _temperature: f32,
        ) -> Result<String, LlmError> {
            *self.captured.lock().unwrap() = turns.to_vec();
            Ok("What drew you to this role?".to_string())
        }
    }

    fn message(role: &str, kind: &str, content: Value) -> MessageRow {
        MessageRow {
            id: 1,
            session_id: Uuid::new_v4(),
            role: role.to_string(),
            kind: kind.to_string(),
            content,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn history_keeps_text_messages_and_maps_roles() {
        let messages = vec![
            message("user", "text", json!("analyze this job")),
            message("assistant", "table", json!([{"name": "A"}])),
            message("bot", "text", json!("Tell me about yourself.")),
            message("user", "text", json!("I build backends.")),
        ];

        let history = build_history(&messages);

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[1].role, TurnRole::Assistant);
        assert_eq!(history[1].content, "Tell me about yourself.");
        assert_eq!(history[2].role, TurnRole::User);
    }

    #[tokio::test]
    async fn model_failure_returns_fallback_question() {
        let question = next_question(&FailingModel, &[], "resume", "job").await;
        assert_eq!(
            question,
            "Let's move to the next topic. Can you tell me about your strengths?"
        );
    }

    #[tokio::test]
    async fn system_prompt_leads_and_history_follows() {
        let model = CapturingModel {
            captured: std::sync::Mutex::new(Vec::new()),
        };
        let history = vec![
            ChatTurn::assistant("Tell me about yourself."),
            ChatTurn::user("I build backends."),
        ];

        let question = next_question(&model, &history, "resume text", "job text").await;

        assert_eq!(question, "What drew you to this role?");
        let captured = model.captured.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].role, TurnRole::System);
        assert!(captured[0].content.contains("job text"));
        assert!(captured[0].content.contains("resume text"));
        assert_eq!(captured[2].content, "I build backends.");
    }
}
