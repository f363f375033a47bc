use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel email written by the scoring pipeline when no address could be
/// extracted. The scheduler treats it (and the literal "None") as
/// unschedulable.
pub const NO_EMAIL: &str = "No Email";

/// The model's structured assessment of one resume against a job
/// description. `score` stays the string the model produced; non-numeric
/// scores sort as 0 but are never rewritten in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub email: String,
    pub score: String,
    pub summary: String,
}

impl CandidateRecord {
    /// Numeric score for ordering only. "85" -> 85, "N/A" -> 0.
    pub fn sort_score(&self) -> i64 {
        self.score.trim().parse::<i64>().unwrap_or(0)
    }
}

/// Outcome of one scheduling attempt. Exactly one entry is emitted per
/// input candidate, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOutcome {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLogEntry {
    pub outcome: ScheduleOutcome,
    pub candidate: String,
    /// Set only for `Sent` entries.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub detail: String,
}
