//! Session identity resolution.
//!
//! Every pipeline that writes history goes through `resolve_or_create`, so
//! a downstream append always has a valid session to attach to and a valid
//! supplied id is never silently duplicated.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::SessionRow;
use crate::sessions::store;

const TITLE_MAX_CHARS: usize = 30;
const TRUNCATION_MARKER: &str = "..";
const DEFAULT_TITLE: &str = "New Chat";

/// Returns the session for `supplied_id` if it parses and resolves,
/// otherwise creates a fresh one titled from `title_hint`. An existing
/// session's title is never overwritten by the hint.
pub async fn resolve_or_create(
    pool: &PgPool,
    supplied_id: Option<&str>,
    title_hint: &str,
) -> Result<SessionRow, AppError> {
    if let Some(raw) = supplied_id {
        if let Ok(id) = Uuid::parse_str(raw) {
            if let Some(session) = store::get_session(pool, id).await? {
                return Ok(session);
            }
        }
    }

    store::create_session(pool, &session_title(title_hint)).await
}

/// Display title for a new session: the hint truncated to 30 characters
/// with a `..` marker when shortened, or a placeholder when empty.
pub fn session_title(hint: &str) -> String {
    let trimmed = hint.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hint_kept_verbatim() {
        assert_eq!(session_title("Backend Engineer"), "Backend Engineer");
    }

    #[test]
    fn exactly_thirty_chars_not_truncated() {
        let hint = "a".repeat(30);
        assert_eq!(session_title(&hint), hint);
    }

    #[test]
    fn long_hint_truncated_with_marker() {
        let hint = "Senior Rust Engineer with ten years of experience";
        let title = session_title(hint);
        assert_eq!(title.chars().count(), 32);
        assert!(title.ends_with(".."));
        assert!(title.starts_with("Senior Rust Engineer"));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let hint = "é".repeat(31);
        let title = session_title(&hint);
        assert_eq!(title.chars().count(), 32);
    }

    #[test]
    fn empty_hint_gets_placeholder() {
        assert_eq!(session_title(""), "New Chat");
        assert_eq!(session_title("   "), "New Chat");
    }
}
