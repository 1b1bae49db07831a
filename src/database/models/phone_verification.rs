use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Durable record that a Telegram user proved ownership of a phone number.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PhoneVerification {
    pub id: i64,
    pub user_id: i64,
    pub telegram_username: Option<String>,
    pub phone_number: String,
    pub is_verified: bool,
    pub verification_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PhoneVerification {
    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PhoneVerification>(
            "SELECT id, user_id, telegram_username, phone_number, is_verified, verification_date, created_at, updated_at FROM phone_verifications WHERE user_id = ?"
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn is_user_verified(pool: &sqlx::SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_user(pool, user_id)
            .await?
            .map(|v| v.is_verified)
            .unwrap_or(false))
    }

    /// Creates or updates the user's row and marks it verified now.
    pub async fn mark_verified(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        username: Option<String>,
        phone_number: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO phone_verifications
                (user_id, telegram_username, phone_number, is_verified, verification_date, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                telegram_username = excluded.telegram_username,
                phone_number = excluded.phone_number,
                is_verified = 1,
                verification_date = excluded.verification_date,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(phone_number)
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_user(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
