use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An official channel shown from the private-chat menu.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub description: Option<String>,
    pub link: String,
    pub display_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSeed {
    pub name: String,
    pub username: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

impl Channel {
    /// All channels by `display_order`, ties in insertion order.
    pub async fn list_ordered(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Channel>(
            r#"
            SELECT id, name, username, description, link, display_order, created_at, updated_at
            FROM channels
            ORDER BY display_order, id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn upsert(pool: &sqlx::SqlitePool, seed: &ChannelSeed) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO channels (name, username, description, link, display_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                link = excluded.link,
                display_order = excluded.display_order,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&seed.name)
        .bind(&seed.username)
        .bind(&seed.description)
        .bind(&seed.link)
        .bind(seed.display_order)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        sqlx::query_as::<_, Channel>(
            "SELECT id, name, username, description, link, display_order, created_at, updated_at FROM channels WHERE username = ?"
        )
        .bind(&seed.username)
        .fetch_one(pool)
        .await
    }
}
