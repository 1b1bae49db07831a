use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::table::KeywordTable;

/// A keyword reply row as the persisted store hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub keyword: String,
    pub response: String,
    pub is_active: bool,
}

impl KeywordEntry {
    pub fn active(keyword: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            response: response.into(),
            is_active: true,
        }
    }
}

/// Live, editable keyword replies.
///
/// When several stored keywords match the same message, the one listed first
/// wins, so implementations must return entries in a stable order.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn list_active_entries(&self) -> anyhow::Result<Vec<KeywordEntry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Persisted,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub keyword: String,
    pub response: String,
    pub source: MatchSource,
}

/// Maps message text to at most one reply.
///
/// Matching is case-insensitive substring containment, first hit in
/// iteration order. A longer, more specific keyword later in the order does
/// not beat an earlier short one.
pub struct KeywordResolver {
    source: Arc<dyn KeywordSource>,
    table: KeywordTable,
}

impl KeywordResolver {
    pub fn new(source: Arc<dyn KeywordSource>, table: KeywordTable) -> Self {
        Self { source, table }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub async fn resolve(&self, message_text: &str) -> Option<String> {
        self.resolve_match(message_text).await.map(|m| m.response)
    }

    pub async fn resolve_match(&self, message_text: &str) -> Option<KeywordMatch> {
        if message_text.is_empty() {
            return None;
        }
        let message_lower = message_text.to_lowercase();

        match self.source.list_active_entries().await {
            Ok(entries) => {
                let hit = entries
                    .into_iter()
                    .filter(|entry| entry.is_active)
                    .find(|entry| message_lower.contains(&entry.keyword.to_lowercase()));
                if let Some(entry) = hit {
                    debug!("Matched stored keyword '{}'", entry.keyword);
                    return Some(KeywordMatch {
                        keyword: entry.keyword,
                        response: entry.response,
                        source: MatchSource::Persisted,
                    });
                }
            }
            Err(e) => {
                warn!("Keyword store query failed, using static table: {:#}", e);
            }
        }

        self.table
            .iter()
            .find(|(keyword, _)| message_lower.contains(&keyword.to_lowercase()))
            .map(|(keyword, response)| {
                debug!("Matched static keyword '{}'", keyword);
                KeywordMatch {
                    keyword: keyword.to_string(),
                    response: response.to_string(),
                    source: MatchSource::Static,
                }
            })
    }
}
