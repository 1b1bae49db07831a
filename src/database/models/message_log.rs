use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MessageLog {
    pub id: i64,
    pub chat_id: i64,
    pub chat_type: String,
    pub chat_title: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub message_text: Option<String>,
    pub trigger_keyword: Option<String>,
    pub is_admin: bool,
    pub processed_at: String,
}

/// Fields for a new log row.
#[derive(Debug, Clone, Default)]
pub struct NewMessageLog {
    pub chat_id: i64,
    pub chat_type: String,
    pub chat_title: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub message_text: Option<String>,
    pub trigger_keyword: Option<String>,
    pub is_admin: bool,
}

impl MessageLog {
    pub async fn insert(pool: &sqlx::SqlitePool, entry: NewMessageLog) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO message_logs
                (chat_id, chat_type, chat_title, user_id, username, message_text, trigger_keyword, is_admin, processed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.chat_id)
        .bind(entry.chat_type)
        .bind(entry.chat_title)
        .bind(entry.user_id)
        .bind(entry.username)
        .bind(entry.message_text)
        .bind(entry.trigger_keyword)
        .bind(entry.is_admin)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_chat(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MessageLog>(
            "SELECT id, chat_id, chat_type, chat_title, user_id, username, message_text, trigger_keyword, is_admin, processed_at FROM message_logs WHERE chat_id = ? ORDER BY id DESC LIMIT ?"
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_chat(pool: &sqlx::SqlitePool, chat_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM message_logs WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
