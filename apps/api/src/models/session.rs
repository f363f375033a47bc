use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persistent conversation thread: a resume-analysis chat or a voice
/// interview. Deleting a session cascades to its messages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// One immutable turn within a session. Within a session, `created_at`
/// order (with `id` as tiebreak) equals insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub session_id: Uuid,
    pub role: String,
    pub kind: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// What the `content` column holds: free text or a ranked candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Table,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Table => "table",
        }
    }
}

impl MessageRow {
    /// True for plain conversational turns, the only kind replayed into the
    /// interview model's context window.
    pub fn is_text(&self) -> bool {
        self.kind == MessageKind::Text.as_str()
    }

    /// Assistant turns were historically written under the role "bot";
    /// treat both spellings as the assistant side.
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant" || self.role == "bot"
    }

    /// The content payload as plain text (text kinds store a JSON string).
    pub fn text_content(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
