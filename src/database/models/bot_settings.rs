use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Editable bot texts. Unset fields fall back to the built-in copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BotSettings {
    #[serde(default)]
    pub private_chat_welcome: Option<String>,
    #[serde(default)]
    pub channel_info: Option<String>,
}

impl BotSettings {
    pub async fn load(pool: &sqlx::SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, BotSettings>(
            "SELECT private_chat_welcome, channel_info FROM bot_settings WHERE id = 1",
        )
        .fetch_optional(pool)
        .await
    }

    pub async fn save(pool: &sqlx::SqlitePool, settings: &BotSettings) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO bot_settings (id, private_chat_welcome, channel_info, updated_at)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                private_chat_welcome = excluded.private_chat_welcome,
                channel_info = excluded.channel_info,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.private_chat_welcome)
        .bind(&settings.channel_info)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
        Ok(())
    }
}
