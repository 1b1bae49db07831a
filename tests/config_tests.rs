use group_admin_bot::config::{Config, TwilioConfig};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const ALL_VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "DATABASE_URL",
    "HTTP_PORT",
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "TWILIO_PHONE_NUMBER",
    "KEYWORD_RESPONSES_FILE",
    "VERIFICATION_CODE_LENGTH",
    "VERIFICATION_TTL_MINUTES",
    "CLEANUP_SCHEDULE",
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("TWILIO_ACCOUNT_SID", "AC123");
    env::set_var("TWILIO_AUTH_TOKEN", "secret");
    env::set_var("TWILIO_PHONE_NUMBER", "+15005550006");
    env::set_var("KEYWORD_RESPONSES_FILE", "config/keywords.json");
    env::set_var("VERIFICATION_CODE_LENGTH", "8");
    env::set_var("VERIFICATION_TTL_MINUTES", "15");
    env::set_var("CLEANUP_SCHEDULE", "0 * * * * *");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(
        config.twilio,
        Some(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15005550006".to_string(),
        })
    );
    assert_eq!(config.keyword_responses_file, Some(PathBuf::from("config/keywords.json")));
    assert_eq!(config.verification_code_length, 8);
    assert_eq!(config.verification_ttl_minutes, 15);
    assert_eq!(config.cleanup_schedule, "0 * * * * *");

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/group_bot.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.twilio, None);
    assert_eq!(config.keyword_responses_file, None);
    assert_eq!(config.verification_code_length, 6);
    assert_eq!(config.verification_ttl_minutes, 10);
    assert_eq!(config.cleanup_schedule, "0 */5 * * * *");

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    env::set_var("HTTP_PORT", "-1");
    assert!(Config::from_env().is_err());

    env::set_var("HTTP_PORT", "65535");
    assert_eq!(Config::from_env().unwrap().http_port, 65535);

    clear_env();
}

#[test]
fn test_partial_twilio_setup_counts_as_unconfigured() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("TWILIO_ACCOUNT_SID", "AC123");
    env::set_var("TWILIO_AUTH_TOKEN", "secret");

    let config = Config::from_env().unwrap();
    assert_eq!(config.twilio, None);

    clear_env();
}

#[test]
fn test_verification_settings_are_validated() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");

    for bad_length in ["3", "11", "six"] {
        env::set_var("VERIFICATION_CODE_LENGTH", bad_length);
        let err = Config::from_env().unwrap_err().to_string();
        assert!(err.contains("VERIFICATION_CODE_LENGTH"), "accepted length {bad_length}");
    }
    env::set_var("VERIFICATION_CODE_LENGTH", "4");
    assert_eq!(Config::from_env().unwrap().verification_code_length, 4);
    env::remove_var("VERIFICATION_CODE_LENGTH");

    for bad_ttl in ["0", "-5", "ten", "1441", "9223372036854775807"] {
        env::set_var("VERIFICATION_TTL_MINUTES", bad_ttl);
        let err = Config::from_env().unwrap_err().to_string();
        assert!(err.contains("VERIFICATION_TTL_MINUTES"), "accepted ttl {bad_ttl}");
    }
    env::set_var("VERIFICATION_TTL_MINUTES", "1440");
    assert_eq!(Config::from_env().unwrap().verification_ttl_minutes, 1440);

    clear_env();
}

#[test]
fn test_config_empty_values() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "");
    assert!(Config::from_env().is_err());

    env::set_var("TELEGRAM_BOT_TOKEN", "valid_token");
    env::set_var("DATABASE_URL", "");
    env::set_var("KEYWORD_RESPONSES_FILE", "   ");
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite:./data/group_bot.db");
    assert_eq!(config.keyword_responses_file, None);

    clear_env();
}

#[test]
fn test_config_whitespace_handling() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "  token_with_spaces  ");
    env::set_var("DATABASE_URL", "  sqlite:spaced.db  ");
    env::set_var("HTTP_PORT", "  3000  ");

    let config = Config::from_env().unwrap();

    // Environment variables should preserve whitespace as-is
    assert_eq!(config.telegram_bot_token, "  token_with_spaces  ");
    assert_eq!(config.database_url, "  sqlite:spaced.db  ");
    assert_eq!(config.http_port, 3000);

    clear_env();
}
