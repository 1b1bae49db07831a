use anyhow::{anyhow, Result};
use chrono::Duration;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{6,15}$").expect("phone pattern should be valid"));

#[allow(clippy::expect_used)]
static BRACKETED_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[【\[(]([\s\d]+)[】\])]").expect("group number pattern should be valid")
});

#[allow(clippy::expect_used)]
static BARE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{3,4}\s*$").expect("bare number pattern should be valid"));

/// Phone numbers must be `+` followed by 6 to 15 digits (country code included).
pub fn validate_phone_number(input: &str) -> Result<String> {
    let phone = input.trim();
    if !PHONE_PATTERN.is_match(phone) {
        return Err(anyhow!("Phone number must look like +8613812345678"));
    }
    Ok(phone.to_string())
}

pub fn validate_verification_code(input: &str, expected_length: usize) -> Result<String> {
    let code = input.trim();
    if code.len() != expected_length || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Verification code must be {} digits", expected_length));
    }
    Ok(code.to_string())
}

/// Pulls a directory group number out of a private message.
///
/// Accepts `【123】`, `[123]`, `(123)` anywhere in the text or a bare 3-4
/// digit message. Inner spaces and leading zeros are dropped.
pub fn extract_group_number(text: &str) -> Option<String> {
    let raw = if let Some(caps) = BRACKETED_NUMBER_PATTERN.captures(text) {
        caps.get(1)?.as_str().to_string()
    } else if BARE_NUMBER_PATTERN.is_match(text) {
        text.to_string()
    } else {
        return None;
    };

    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return None;
    }
    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
}

/// Target of a moderation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetUser {
    Id(u64),
    Username(String),
}

pub fn parse_target_user(input: &str) -> Result<TargetUser> {
    let target = input.trim();
    let target = target.strip_prefix('@').unwrap_or(target);

    if target.is_empty() {
        return Err(anyhow!("Target user cannot be empty"));
    }

    if target.chars().all(|c| c.is_ascii_digit()) {
        let id = target
            .parse::<u64>()
            .map_err(|_| anyhow!("User ID out of range"))?;
        return Ok(TargetUser::Id(id));
    }

    Ok(TargetUser::Username(target.to_string()))
}

pub const DEFAULT_MUTE_DURATION_SECS: i64 = 60 * 60;
/// Telegram treats longer restrictions as permanent.
pub const MAX_MUTE_DURATION_SECS: i64 = 366 * 24 * 60 * 60;

/// Parses `30m`, `2h`, `1d`. A bare number or unknown unit means minutes and
/// a missing number means 1.
pub fn parse_mute_duration(input: &str) -> Result<Duration> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Err(anyhow!("Duration cannot be empty"));
    }

    let (digits, unit): (String, String) = input.chars().partition(|c| c.is_ascii_digit());
    let value: i64 = if digits.is_empty() {
        1
    } else {
        digits.parse().map_err(|_| anyhow!("Duration is too large"))?
    };

    let seconds = match unit.as_str() {
        "h" => value.checked_mul(60 * 60),
        "d" => value.checked_mul(24 * 60 * 60),
        _ => value.checked_mul(60),
    }
    .ok_or_else(|| anyhow!("Duration is too large"))?;

    if seconds <= 0 {
        return Err(anyhow!("Duration must be positive"));
    }

    if seconds > MAX_MUTE_DURATION_SECS {
        return Err(anyhow!("Duration cannot exceed 366 days"));
    }

    Ok(Duration::seconds(seconds))
}

/// Minutes, hours or days, whichever unit fits, for moderation replies.
pub fn format_mute_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs < 60 * 60 {
        format!("{}分钟", secs / 60)
    } else if secs < 24 * 60 * 60 {
        format!("{}小时", secs / (60 * 60))
    } else {
        format!("{}天", secs / (24 * 60 * 60))
    }
}
