//! Interview scheduling pipeline.
//!
//! Time slots are assigned deterministically from position in the confirmed
//! candidate list: a sent invitation consumes 30 minutes of interview plus
//! a 10 minute gap. A skipped candidate consumes nothing. What a *failed*
//! send consumes is a policy choice (`SlotPolicy`): the default reuses the
//! slot for the next candidate, matching the behavior this service always
//! had.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::config::SlotPolicy;
use crate::models::candidate::{ScheduleLogEntry, ScheduleOutcome, NO_EMAIL};
use crate::scheduling::mailer::Mailer;

const DURATION_MINUTES: i64 = 30;
const GAP_MINUTES: i64 = 10;

/// A candidate confirmed for scheduling. Only name and email matter here;
/// callers usually pass through records from the scoring table.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleCandidate {
    pub name: String,
    pub email: String,
}

/// Sends invitations in input order, one log entry per candidate regardless
/// of outcome.
pub async fn schedule_interviews(
    mailer: &dyn Mailer,
    candidates: &[ScheduleCandidate],
    start_time: DateTime<Utc>,
    meeting_link: Option<&str>,
    policy: SlotPolicy,
) -> Vec<ScheduleLogEntry> {
    let mut logs = Vec::with_capacity(candidates.len());
    let mut current_time = start_time;

    for candidate in candidates {
        if candidate.email.contains(NO_EMAIL) || candidate.email == "None" {
            logs.push(ScheduleLogEntry {
                outcome: ScheduleOutcome::Skipped,
                candidate: candidate.name.clone(),
                scheduled_at: None,
                detail: format!("Skipped {} (No Email)", candidate.name),
            });
            continue;
        }

        let subject = invitation_subject(&candidate.name);
        let body = invitation_body(&candidate.name, current_time, meeting_link);

        match mailer.send(&candidate.email, &subject, &body).await {
            Ok(()) => {
                logs.push(ScheduleLogEntry {
                    outcome: ScheduleOutcome::Sent,
                    candidate: candidate.name.clone(),
                    scheduled_at: Some(current_time),
                    detail: format!(
                        "Email Sent: {} for {}",
                        candidate.name,
                        current_time.format("%H:%M")
                    ),
                });
                current_time += Duration::minutes(DURATION_MINUTES + GAP_MINUTES);
            }
            Err(e) => {
                warn!("Invitation to {} failed: {e}", candidate.email);
                logs.push(ScheduleLogEntry {
                    outcome: ScheduleOutcome::Failed,
                    candidate: candidate.name.clone(),
                    scheduled_at: None,
                    detail: format!("Email Failed: {} ({e})", candidate.name),
                });
                if policy == SlotPolicy::AdvanceSlot {
                    current_time += Duration::minutes(DURATION_MINUTES + GAP_MINUTES);
                }
            }
        }
    }

    logs
}

pub fn invitation_subject(candidate_name: &str) -> String {
    format!("Interview Invitation: {candidate_name}")
}

/// Plain-text invitation body. The time is rendered for humans
/// ("Monday, January 05 at 10:00"), not machines.
pub fn invitation_body(
    candidate_name: &str,
    start_time: DateTime<Utc>,
    meeting_link: Option<&str>,
) -> String {
    let formatted_time = start_time.format("%A, %B %d at %H:%M");
    let link_line = match meeting_link {
        Some(link) => format!("\nMeeting Link: {link}\n"),
        None => String::new(),
    };

    format!(
        "Hi {candidate_name},\n\n\
         We have reviewed your profile and would like to invite you for an interview!\n\n\
         Scheduled Time: {formatted_time}\n{link_line}\n\
         Please reply to this email to confirm your availability. If you are unable to \
         attend at this time, let us know on which date and time you would be available.\n\n\
         Best regards,\n\
         Hiring Team"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::mailer::MailError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Records sends; fails any recipient containing "unreachable".
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
            if to.contains("unreachable") {
                return Err(MailError::Address(
                    "@".parse::<lettre::Address>().unwrap_err(),
                ));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn candidate(name: &str, email: &str) -> ScheduleCandidate {
        ScheduleCandidate {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn ten_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn skipped_candidate_consumes_no_slot() {
        let mailer = RecordingMailer::new();
        let candidates = vec![
            candidate("A", "a@x.com"),
            candidate("B", "No Email"),
            candidate("C", "c@x.com"),
        ];

        let logs =
            schedule_interviews(&mailer, &candidates, ten_am(), None, SlotPolicy::ReuseSlot).await;

        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].outcome, ScheduleOutcome::Sent);
        assert_eq!(logs[0].scheduled_at, Some(ten_am()));
        assert_eq!(logs[1].outcome, ScheduleOutcome::Skipped);
        assert_eq!(logs[1].scheduled_at, None);
        assert_eq!(logs[2].outcome, ScheduleOutcome::Sent);
        // B consumed nothing: C goes 40 minutes after A, not 80.
        assert_eq!(logs[2].scheduled_at, Some(ten_am() + Duration::minutes(40)));
    }

    #[tokio::test]
    async fn literal_none_email_is_skipped() {
        let mailer = RecordingMailer::new();
        let candidates = vec![candidate("B", "None")];

        let logs =
            schedule_interviews(&mailer, &candidates, ten_am(), None, SlotPolicy::ReuseSlot).await;

        assert_eq!(logs[0].outcome, ScheduleOutcome::Skipped);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_send_reuses_slot_under_default_policy() {
        let mailer = RecordingMailer::new();
        let candidates = vec![
            candidate("A", "unreachable@x.com"),
            candidate("B", "b@x.com"),
        ];

        let logs =
            schedule_interviews(&mailer, &candidates, ten_am(), None, SlotPolicy::ReuseSlot).await;

        assert_eq!(logs[0].outcome, ScheduleOutcome::Failed);
        assert_eq!(logs[1].outcome, ScheduleOutcome::Sent);
        assert_eq!(logs[1].scheduled_at, Some(ten_am()));
    }

    #[tokio::test]
    async fn failed_send_advances_slot_under_advance_policy() {
        let mailer = RecordingMailer::new();
        let candidates = vec![
            candidate("A", "unreachable@x.com"),
            candidate("B", "b@x.com"),
        ];

        let logs =
            schedule_interviews(&mailer, &candidates, ten_am(), None, SlotPolicy::AdvanceSlot)
                .await;

        assert_eq!(logs[1].scheduled_at, Some(ten_am() + Duration::minutes(40)));
    }

    #[tokio::test]
    async fn output_order_equals_input_order() {
        let mailer = RecordingMailer::new();
        let candidates = vec![
            candidate("First", "f@x.com"),
            candidate("Second", "No Email"),
            candidate("Third", "unreachable@x.com"),
        ];

        let logs =
            schedule_interviews(&mailer, &candidates, ten_am(), None, SlotPolicy::ReuseSlot).await;

        let names: Vec<&str> = logs.iter().map(|l| l.candidate.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn meeting_link_appears_in_body() {
        let mailer = RecordingMailer::new();
        let candidates = vec![candidate("A", "a@x.com")];

        schedule_interviews(
            &mailer,
            &candidates,
            ten_am(),
            Some("https://meet.example.com/abc"),
            SlotPolicy::ReuseSlot,
        )
        .await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].1, "Interview Invitation: A");
        assert!(sent[0].2.contains("https://meet.example.com/abc"));
        assert!(sent[0].2.contains("Monday, January 05 at 10:00"));
    }
}
