use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A listed group in the public directory, looked up by number or keyword.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub group_number: String,
    pub name: String,
    pub link: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Directory entry as written by the seeding tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSeed {
    pub number: String,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["卡商", "pos机"], "卡商"),
    (&["代收", "代付", "支付"], "代收代付"),
    (&["白资"], "白资"),
    (&["承兑", "usdt", "互换"], "承兑"),
    (&["换汇", "货币"], "换汇"),
    (&["包网", "搭建"], "包网"),
    (&["技术", "开发"], "技术"),
];

/// `%keyword%` with the `LIKE` wildcards in `keyword` escaped by `\`.
pub fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl Group {
    /// Display category derived from the description, `钱钱` when nothing fits.
    pub fn category(&self) -> &'static str {
        let description = self.description.as_deref().unwrap_or_default().to_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| description.contains(n)))
            .map(|(_, category)| *category)
            .unwrap_or("钱钱")
    }

    pub async fn find_by_number(
        pool: &sqlx::SqlitePool,
        group_number: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, group_number, name, link, description, created_at, updated_at FROM groups WHERE group_number = ?"
        )
        .bind(group_number)
        .fetch_optional(pool)
        .await
    }

    /// Groups tagged with a keyword containing `keyword`; when none are
    /// tagged, groups whose name or description contains it.
    pub async fn search(pool: &sqlx::SqlitePool, keyword: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = like_pattern(keyword);

        let tagged = sqlx::query_as::<_, Group>(
            r#"
            SELECT DISTINCT g.id, g.group_number, g.name, g.link, g.description, g.created_at, g.updated_at
            FROM groups g
            JOIN group_keywords gk ON gk.group_id = g.id
            JOIN keywords k ON k.id = gk.keyword_id
            WHERE k.word LIKE ? ESCAPE '\'
            ORDER BY g.id
            "#,
        )
        .bind(&pattern)
        .fetch_all(pool)
        .await?;

        if !tagged.is_empty() {
            return Ok(tagged);
        }

        sqlx::query_as::<_, Group>(
            r#"
            SELECT id, group_number, name, link, description, created_at, updated_at
            FROM groups
            WHERE name LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(pool)
        .await
    }

    /// Inserts or updates a directory entry and attaches its keywords.
    pub async fn upsert(pool: &sqlx::SqlitePool, seed: &GroupSeed) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO groups (group_number, name, link, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(group_number) DO UPDATE SET
                name = excluded.name,
                link = excluded.link,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&seed.number)
        .bind(&seed.name)
        .bind(&seed.link)
        .bind(&seed.description)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let group = Self::find_by_number(pool, &seed.number)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        for word in &seed.keywords {
            sqlx::query("INSERT OR IGNORE INTO keywords (word, created_at) VALUES (?, ?)")
                .bind(word)
                .bind(&now)
                .execute(pool)
                .await?;
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO group_keywords (group_id, keyword_id)
                SELECT ?, id FROM keywords WHERE word = ?
                "#,
            )
            .bind(group.id)
            .bind(word)
            .execute(pool)
            .await?;
        }

        Ok(group)
    }
}
