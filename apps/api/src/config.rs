use anyhow::{Context, Result};

/// Slot policy applied when an invitation email fails to send.
///
/// `ReuseSlot` preserves the historical behavior: a failed send does not
/// advance the clock, so the next candidate is offered the same time. That
/// slot may later be double-booked if the failed invite is retried
/// out-of-band, which is why the policy is an explicit configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    ReuseSlot,
    AdvanceSlot,
}

impl SlotPolicy {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "reuse-slot" => Ok(SlotPolicy::ReuseSlot),
            "advance-slot" => Ok(SlotPolicy::AdvanceSlot),
            other => anyhow::bail!(
                "FAILED_SEND_POLICY must be 'reuse-slot' or 'advance-slot', got '{other}'"
            ),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails with context if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub stt_url: String,
    pub tts_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
    pub failed_send_policy: SlotPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            stt_url: require_env("STT_URL")?,
            tts_url: require_env("TTS_URL")?,
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            sender_email: require_env("SENDER_EMAIL")?,
            sender_password: require_env("SENDER_PASSWORD")?,
            failed_send_policy: SlotPolicy::parse(
                &std::env::var("FAILED_SEND_POLICY").unwrap_or_else(|_| "reuse-slot".to_string()),
            )?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_policy_parses_both_variants() {
        assert_eq!(
            SlotPolicy::parse("reuse-slot").unwrap(),
            SlotPolicy::ReuseSlot
        );
        assert_eq!(
            SlotPolicy::parse("advance-slot").unwrap(),
            SlotPolicy::AdvanceSlot
        );
    }

    #[test]
    fn slot_policy_rejects_unknown() {
        assert!(SlotPolicy::parse("retry-forever").is_err());
    }
}
