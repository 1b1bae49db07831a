use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::connection::DatabaseManager;
use crate::keywords::{KeywordEntry, KeywordSource};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct KeywordResponse {
    pub id: i64,
    pub keyword: String,
    pub response: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Outcome of [`KeywordResponse::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl KeywordResponse {
    /// Active rows in insertion order, which is also their match priority.
    pub async fn find_active(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, KeywordResponse>(
            "SELECT id, keyword, response, is_active, created_at, updated_at FROM keyword_responses WHERE is_active = 1 ORDER BY id"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, KeywordResponse>(
            "SELECT id, keyword, response, is_active, created_at, updated_at FROM keyword_responses ORDER BY id"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_keyword(
        pool: &sqlx::SqlitePool,
        keyword: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, KeywordResponse>(
            "SELECT id, keyword, response, is_active, created_at, updated_at FROM keyword_responses WHERE keyword = ?"
        )
        .bind(keyword)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        keyword: &str,
        response: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO keyword_responses (keyword, response, is_active, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?)
            "#,
        )
        .bind(keyword)
        .bind(response)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_keyword(pool, keyword)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Inserts the keyword or refreshes its response and reactivates it.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        keyword: &str,
        response: &str,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        if Self::find_by_keyword(pool, keyword).await?.is_none() {
            Self::create(pool, keyword, response).await?;
            return Ok(UpsertOutcome::Inserted);
        }

        sqlx::query(
            "UPDATE keyword_responses SET response = ?, is_active = 1, updated_at = ? WHERE keyword = ?",
        )
        .bind(response)
        .bind(Utc::now().to_rfc3339())
        .bind(keyword)
        .execute(pool)
        .await?;
        Ok(UpsertOutcome::Updated)
    }

    pub async fn set_active(
        pool: &sqlx::SqlitePool,
        keyword: &str,
        is_active: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE keyword_responses SET is_active = ?, updated_at = ? WHERE keyword = ?",
        )
        .bind(is_active)
        .bind(Utc::now().to_rfc3339())
        .bind(keyword)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl KeywordSource for DatabaseManager {
    async fn list_active_entries(&self) -> anyhow::Result<Vec<KeywordEntry>> {
        let rows = KeywordResponse::find_active(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| KeywordEntry {
                keyword: row.keyword,
                response: row.response,
                is_active: row.is_active,
            })
            .collect())
    }
}
