//! Persistence store for sessions and their ordered message history.
//!
//! Every write is a single statement, so no partial session or message is
//! ever visible. Ordering is `created_at` with the serial `id` as tiebreak,
//! which makes chronological replay equal to insertion order even when two
//! appends land in the same clock tick.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{MessageKind, MessageRole, MessageRow, SessionRow};

pub async fn create_session(pool: &PgPool, title: &str) -> Result<SessionRow, AppError> {
    let session: SessionRow = sqlx::query_as(
        "INSERT INTO chat_sessions (id, title) VALUES ($1, $2)
         RETURNING id, title, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn get_session(pool: &PgPool, id: Uuid) -> Result<Option<SessionRow>, AppError> {
    let session = sqlx::query_as("SELECT id, title, created_at FROM chat_sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(session)
}

/// All sessions, newest creation time first.
pub async fn list_sessions(pool: &PgPool) -> Result<Vec<SessionRow>, AppError> {
    let sessions =
        sqlx::query_as("SELECT id, title, created_at FROM chat_sessions ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

    Ok(sessions)
}

/// Appends one immutable message to a session's history.
pub async fn append_message(
    pool: &PgPool,
    session_id: Uuid,
    role: MessageRole,
    kind: MessageKind,
    content: &Value,
) -> Result<MessageRow, AppError> {
    let message: Result<MessageRow, sqlx::Error> = sqlx::query_as(
        "INSERT INTO chat_messages (session_id, role, kind, content)
         VALUES ($1, $2, $3, $4)
         RETURNING id, session_id, role, kind, content, created_at",
    )
    .bind(session_id)
    .bind(role.as_str())
    .bind(kind.as_str())
    .bind(content)
    .fetch_one(pool)
    .await;

    match message {
        Ok(m) => Ok(m),
        // FK violation: the session id does not resolve.
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Err(AppError::NotFound(
            format!("Session {session_id} not found"),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Messages for one session in chronological order. With a `limit`, the
/// newest N are fetched and reversed so the caller still sees oldest-first.
pub async fn get_messages(
    pool: &PgPool,
    session_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<MessageRow>, AppError> {
    let messages: Vec<MessageRow> = match limit {
        Some(n) => {
            let mut newest_first: Vec<MessageRow> = sqlx::query_as(
                "SELECT id, session_id, role, kind, content, created_at
                 FROM chat_messages WHERE session_id = $1
                 ORDER BY created_at DESC, id DESC LIMIT $2",
            )
            .bind(session_id)
            .bind(n)
            .fetch_all(pool)
            .await?;
            newest_first.reverse();
            newest_first
        }
        None => {
            sqlx::query_as(
                "SELECT id, session_id, role, kind, content, created_at
                 FROM chat_messages WHERE session_id = $1
                 ORDER BY created_at ASC, id ASC",
            )
            .bind(session_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(messages)
}

pub async fn rename_session(pool: &PgPool, id: Uuid, new_title: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE chat_sessions SET title = $1 WHERE id = $2")
        .bind(new_title)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(())
}

/// Deletes a session; the FK cascade removes its messages in the same
/// statement.
pub async fn delete_session(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(())
}

pub async fn delete_all_sessions(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("DELETE FROM chat_sessions").execute(pool).await?;
    Ok(())
}
