use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub twilio: Option<TwilioConfig>,
    pub keyword_responses_file: Option<PathBuf>,
    pub verification_code_length: usize,
    pub verification_ttl_minutes: i64,
    pub cleanup_schedule: String,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/group_bot.db";
const DEFAULT_CLEANUP_SCHEDULE: &str = "0 */5 * * * *";

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url =
            non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        // All three Twilio values or none; a partial setup behaves as unconfigured.
        let twilio = match (
            non_empty_var("TWILIO_ACCOUNT_SID"),
            non_empty_var("TWILIO_AUTH_TOKEN"),
            non_empty_var("TWILIO_PHONE_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let keyword_responses_file = non_empty_var("KEYWORD_RESPONSES_FILE").map(PathBuf::from);

        let verification_code_length = match non_empty_var("VERIFICATION_CODE_LENGTH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|len| (4..=10).contains(len))
                .ok_or_else(|| anyhow!("Invalid VERIFICATION_CODE_LENGTH (expected 4-10)"))?,
            None => crate::verification::DEFAULT_CODE_LENGTH,
        };

        let verification_ttl_minutes = match non_empty_var("VERIFICATION_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=crate::verification::MAX_TTL_MINUTES).contains(ttl))
                .ok_or_else(|| {
                    anyhow!(
                        "Invalid VERIFICATION_TTL_MINUTES (expected 1-{})",
                        crate::verification::MAX_TTL_MINUTES
                    )
                })?,
            None => crate::verification::DEFAULT_TTL_MINUTES,
        };

        let cleanup_schedule = non_empty_var("CLEANUP_SCHEDULE")
            .unwrap_or_else(|| DEFAULT_CLEANUP_SCHEDULE.to_string());

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            twilio,
            keyword_responses_file,
            verification_code_length,
            verification_ttl_minutes,
            cleanup_schedule,
        })
    }
}
