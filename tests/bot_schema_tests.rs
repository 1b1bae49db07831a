use group_admin_bot::bot::{AppContext, BotHandler, VerifyState, VerifyStorage};
use group_admin_bot::database::connection::DatabaseManager;
use group_admin_bot::keywords::{KeywordResolver, KeywordTable};
use group_admin_bot::services::health::BotStatus;
use group_admin_bot::sms::TwilioSender;
use group_admin_bot::verification::{SystemClock, VerificationRegistry};
use std::sync::Arc;
use teloxide::dispatching::dialogue::Storage;
use teloxide::types::ChatId;
use tempfile::TempDir;

async fn test_context(temp_dir: &TempDir) -> AppContext {
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");
    let db_arc = Arc::new(db);

    let registry = Arc::new(VerificationRegistry::new(
        Arc::new(TwilioSender::new(None)),
        Arc::new(SystemClock),
    ));

    AppContext {
        db: db_arc.as_ref().clone(),
        registry,
        resolver: Arc::new(KeywordResolver::new(db_arc, KeywordTable::builtin())),
        status: Arc::new(BotStatus::new()),
        code_length: 6,
        ttl_minutes: 10,
    }
}

#[tokio::test]
async fn test_schema_builds_with_context() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let ctx = test_context(&temp_dir).await;

    let handler = BotHandler::new(ctx);
    let _schema = handler.schema();
    assert_eq!(handler.ctx.code_length, 6);
}

#[tokio::test]
async fn test_verify_storage_tracks_dialogue_state() {
    let storage = VerifyStorage::new();
    let chat = ChatId(42);

    assert_eq!(storage.clone().get_dialogue(chat).await.unwrap(), None);

    storage
        .clone()
        .update_dialogue(chat, VerifyState::AwaitingCode { phone: "+8613812345678".to_string() })
        .await
        .unwrap();
    assert_eq!(
        storage.clone().get_dialogue(chat).await.unwrap(),
        Some(VerifyState::AwaitingCode { phone: "+8613812345678".to_string() })
    );

    storage.clone().remove_dialogue(chat).await.unwrap();
    assert_eq!(storage.get_dialogue(chat).await.unwrap(), None);
}
