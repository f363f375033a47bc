//! Prompt construction for resume scoring.
//!
//! The model is asked for a strict JSON object first; the legacy `||`
//! delimited line remains an accepted fallback format because smaller
//! models still occasionally produce it.

/// Builds the scoring prompt for one resume against the job requirements.
///
/// The email instruction deliberately covers both documents: recruiters
/// sometimes paste a candidate's address into the job-requirements box when
/// the resume itself omits it.
pub fn scoring_prompt(job_requirements: &str, resume_text: &str) -> String {
    format!(
        r#"You are an expert HR AI Agent.

USER INPUT / JOB REQUIREMENTS:
"{job_requirements}"

CANDIDATE RESUME TEXT:
"{resume_text}"

Task:
1. Extract the candidate's full name from the resume.
2. Extract the candidate's email.
   - First, look for the email in the CANDIDATE RESUME.
   - If NOT found in the resume, check the USER INPUT above to see if the user provided an email address there.
   - If found in neither, write "No Email".
3. Give a match score (0-100) based on how well the resume matches the requirements in USER INPUT.
4. Write a concise summary (3-4 lines) justifying the score.
5. Respond with ONLY a JSON object, no code fences, no extra text:
   {{"name": "...", "email": "...", "score": "...", "summary": "..."}}"#
    )
}
