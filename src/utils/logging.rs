use tracing::{error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: u64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_START: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: u64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: u64, chat_id: i64, error: &str) {
    error!(
        "CMD_ERROR: {} by {}({}) in chat {} - {}",
        command, user, user_id, chat_id, error
    );
}

/// Logs a non-admin hitting an admin-only surface
pub fn log_permission_denied(command: &str, user: &str, user_id: u64, chat_id: i64) {
    info!(
        "PERMISSION_DENIED: {} by non-admin {}({}) in chat {}",
        command, user, user_id, chat_id
    );
}

/// Logs validation errors with consistent format
pub fn log_validation_error(command: &str, field: &str, value: &str, error: &str, user: &str, user_id: u64, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - {} field '{}' invalid: {} - user {}({}) in chat {}",
        command, field, value, error, user, user_id, chat_id
    );
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs keyword auto-replies with consistent format
pub fn log_auto_reply(keyword: &str, user: &str, user_id: u64, chat_id: i64, is_admin: bool) {
    info!(
        "AUTO_REPLY: '{}' for {}({}) in chat {} (admin: {})",
        keyword, user, user_id, chat_id, is_admin
    );
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
