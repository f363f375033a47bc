//! Candidate scoring pipeline.
//!
//! Each resume is scored independently; one bad document or one failed
//! model call never affects the other resumes in the batch. The batch is
//! sorted stable-descending by numeric score at the end, so ties and
//! non-numeric scores keep their relative input order.

use std::cmp::Reverse;

use bytes::Bytes;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{ChatModel, ChatTurn};
use crate::models::candidate::{CandidateRecord, NO_EMAIL};
use crate::scoring::extract;
use crate::scoring::prompts::scoring_prompt;

const DELIMITER: &str = "||";
const DEFAULT_NAME: &str = "Unknown";
const DEFAULT_SCORE: &str = "0";
const DEFAULT_SUMMARY: &str = "Could not generate summary.";

/// One uploaded resume, identified by its filename.
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Scores a batch of resumes against the job requirements. Deterministic
/// sampling (temperature 0) so the same batch scores the same way twice.
pub async fn score_candidates(
    model: &dyn ChatModel,
    job_requirements: &str,
    uploads: &[ResumeUpload],
) -> Vec<CandidateRecord> {
    let mut records = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let resume_text = extract::text_from_pdf(&upload.filename, &upload.bytes);
        let prompt = scoring_prompt(job_requirements, &resume_text);

        let record = match model.complete(&[ChatTurn::user(prompt)], 0.0).await {
            Ok(content) => parse_candidate_response(&content),
            Err(e) => {
                warn!("Scoring call failed for '{}': {e}", upload.filename);
                CandidateRecord {
                    name: format!("Error {}", upload.filename),
                    email: "-".to_string(),
                    score: DEFAULT_SCORE.to_string(),
                    summary: e.to_string(),
                }
            }
        };
        records.push(record);
    }

    // Stable descending by numeric score; non-numeric sorts as 0 but the
    // score string itself is left untouched.
    records.sort_by_key(|r| Reverse(r.sort_score()));
    records
}

/// Parses one model response into a candidate record.
///
/// Primary format is a strict JSON object; the `||` delimited line is kept
/// as a fallback. A response in neither format becomes the name field
/// verbatim so the raw output stays visible to the recruiter.
pub fn parse_candidate_response(content: &str) -> CandidateRecord {
    let content = content.trim();

    if let Some(record) = parse_json_response(content) {
        return record;
    }

    if content.contains(DELIMITER) {
        let parts: Vec<&str> = content.split(DELIMITER).collect();
        if parts.len() >= 4 {
            return CandidateRecord {
                name: parts[0].trim().to_string(),
                email: parts[1].trim().to_string(),
                score: parts[2].trim().to_string(),
                summary: parts[3].trim().to_string(),
            };
        }
        return CandidateRecord {
            name: parts[0].trim().to_string(),
            email: NO_EMAIL.to_string(),
            score: DEFAULT_SCORE.to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
        };
    }

    CandidateRecord {
        name: content.to_string(),
        email: NO_EMAIL.to_string(),
        score: DEFAULT_SCORE.to_string(),
        summary: DEFAULT_SUMMARY.to_string(),
    }
}

fn parse_json_response(content: &str) -> Option<CandidateRecord> {
    let value: Value = serde_json::from_str(strip_code_fences(content)).ok()?;
    let obj = value.as_object()?;
    // A JSON object without a name is not a scoring response.
    let name = string_field(obj.get("name")?)?;

    Some(CandidateRecord {
        name: non_empty_or(name, DEFAULT_NAME),
        email: non_empty_or(
            obj.get("email").and_then(string_field).unwrap_or_default(),
            NO_EMAIL,
        ),
        score: non_empty_or(
            obj.get("score").and_then(string_field).unwrap_or_default(),
            DEFAULT_SCORE,
        ),
        summary: non_empty_or(
            obj.get("summary").and_then(string_field).unwrap_or_default(),
            DEFAULT_SUMMARY,
        ),
    })
}

/// Accepts both `"score": "85"` and `"score": 85`.
fn string_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences some models wrap JSON in.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s));
    match inner {
        Some(s) => s.trim(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted model: pops one canned result per call.
    struct ScriptedModel {
        responses: Mutex<Vec<Result<String, String>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<&str, &str>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .rev()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            _turns: &[ChatTurn],
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("scripted model exhausted")
                .map_err(|message| LlmError::Api {
                    status: 500,
                    message,
                })
        }
    }

    fn upload(name: &str) -> ResumeUpload {
        ResumeUpload {
            filename: name.to_string(),
            bytes: Bytes::from_static(b"not a real pdf"),
        }
    }

    #[test]
    fn parses_strict_json_response() {
        let r = parse_candidate_response(
            r#"{"name": "Jane Doe", "email": "jane@example.com", "score": "85", "summary": "Strong fit."}"#,
        );
        assert_eq!(r.name, "Jane Doe");
        assert_eq!(r.email, "jane@example.com");
        assert_eq!(r.score, "85");
        assert_eq!(r.summary, "Strong fit.");
    }

    #[test]
    fn parses_json_with_numeric_score_and_fences() {
        let r = parse_candidate_response(
            "```json\n{\"name\": \"Jane\", \"email\": \"j@e.com\", \"score\": 72, \"summary\": \"ok\"}\n```",
        );
        assert_eq!(r.score, "72");
        assert_eq!(r.name, "Jane");
    }

    #[test]
    fn parses_delimited_fallback_with_trimming() {
        let r = parse_candidate_response(" John Doe || john@example.com || 85 || Solid Python. ");
        assert_eq!(r.name, "John Doe");
        assert_eq!(r.email, "john@example.com");
        assert_eq!(r.score, "85");
        assert_eq!(r.summary, "Solid Python.");
    }

    #[test]
    fn short_delimited_response_takes_only_name() {
        let r = parse_candidate_response("John Doe || john@example.com");
        assert_eq!(r.name, "John Doe");
        assert_eq!(r.email, "No Email");
        assert_eq!(r.score, "0");
        assert_eq!(r.summary, "Could not generate summary.");
    }

    #[test]
    fn response_without_delimiter_becomes_name() {
        let r = parse_candidate_response("I could not find a resume in the provided text.");
        assert_eq!(r.name, "I could not find a resume in the provided text.");
        assert_eq!(r.email, "No Email");
        assert_eq!(r.score, "0");
    }

    #[tokio::test]
    async fn one_failed_model_call_does_not_abort_the_batch() {
        let model = ScriptedModel::new(vec![
            Ok(r#"{"name": "A", "email": "a@x.com", "score": "90", "summary": "s"}"#),
            Err("rate limited"),
            Ok(r#"{"name": "C", "email": "c@x.com", "score": "40", "summary": "s"}"#),
        ]);
        let uploads = vec![upload("a.pdf"), upload("b.pdf"), upload("c.pdf")];

        let records = score_candidates(&model, "job", &uploads).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "A");
        assert_eq!(records[1].name, "C");
        assert_eq!(records[2].name, "Error b.pdf");
        assert_eq!(records[2].score, "0");
        assert!(records[2].summary.contains("rate limited"));
    }

    #[tokio::test]
    async fn sort_is_stable_descending_with_non_numeric_as_zero() {
        let model = ScriptedModel::new(vec![
            Ok("First || a@x.com || N/A || s"),
            Ok("Second || b@x.com || 50 || s"),
            Ok("Third || c@x.com || 0 || s"),
            Ok("Fourth || d@x.com || 50 || s"),
        ]);
        let uploads = vec![
            upload("1.pdf"),
            upload("2.pdf"),
            upload("3.pdf"),
            upload("4.pdf"),
        ];

        let records = score_candidates(&model, "job", &uploads).await;

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        // 50-scorers keep relative order; N/A sorts as 0 but stays "N/A".
        assert_eq!(names, vec!["Second", "Fourth", "First", "Third"]);
        assert_eq!(records[2].score, "N/A");
    }

    #[tokio::test]
    async fn output_length_always_equals_input_length() {
        let model = ScriptedModel::new(vec![Ok("solo response with no structure")]);
        let uploads = vec![upload("broken.pdf")];

        let records = score_candidates(&model, "job", &uploads).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "solo response with no structure");
    }
}
