use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::keywords::KeywordResolver;
use crate::services::health::BotStatus;
use crate::verification::VerificationRegistry;

/// Everything a handler needs besides the Telegram update itself.
#[derive(Clone)]
pub struct AppContext {
    pub db: DatabaseManager,
    pub registry: Arc<VerificationRegistry>,
    pub resolver: Arc<KeywordResolver>,
    pub status: Arc<BotStatus>,
    pub code_length: usize,
    pub ttl_minutes: i64,
}
