use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-chat moderation state. `is_muted` only silences the bot's
/// "admins only" notice; Telegram permissions are not touched.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GroupChatSettings {
    pub id: i64,
    pub chat_id: i64,
    pub chat_title: Option<String>,
    pub is_muted: bool,
    pub muted_at: Option<String>,
    pub muted_by: Option<i64>,
    pub unmuted_at: Option<String>,
    pub unmuted_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl GroupChatSettings {
    pub async fn find_by_chat_id(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, GroupChatSettings>(
            "SELECT id, chat_id, chat_title, is_muted, muted_at, muted_by, unmuted_at, unmuted_by, created_at, updated_at FROM group_chat_settings WHERE chat_id = ?"
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn is_muted(pool: &sqlx::SqlitePool, chat_id: i64) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_chat_id(pool, chat_id)
            .await?
            .map(|s| s.is_muted)
            .unwrap_or(false))
    }

    /// Records a mute or unmute by `actor`, creating the row on first use.
    pub async fn set_muted(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        chat_title: Option<&str>,
        muted: bool,
        actor: i64,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let query = if muted {
            r#"
            INSERT INTO group_chat_settings (chat_id, chat_title, is_muted, muted_at, muted_by, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?, ?, ?)
            ON CONFLICT(chat_id) DO UPDATE SET
                chat_title = excluded.chat_title,
                is_muted = 1,
                muted_at = excluded.muted_at,
                muted_by = excluded.muted_by,
                updated_at = excluded.updated_at
            "#
        } else {
            r#"
            INSERT INTO group_chat_settings (chat_id, chat_title, is_muted, unmuted_at, unmuted_by, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?, ?, ?)
            ON CONFLICT(chat_id) DO UPDATE SET
                chat_title = excluded.chat_title,
                is_muted = 0,
                unmuted_at = excluded.unmuted_at,
                unmuted_by = excluded.unmuted_by,
                updated_at = excluded.updated_at
            "#
        };

        sqlx::query(query)
            .bind(chat_id)
            .bind(chat_title)
            .bind(&now)
            .bind(actor)
            .bind(&now)
            .bind(&now)
            .execute(pool)
            .await?;

        Self::find_by_chat_id(pool, chat_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
