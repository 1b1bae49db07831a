use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::defaults::DEFAULT_KEYWORD_RESPONSES;

/// One line of a keyword override file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordOverride {
    pub keyword: String,
    pub response: String,
}

/// Reads `[{"keyword": "...", "response": "..."}, ...]` from disk.
pub fn load_overrides(path: &Path) -> Result<Vec<KeywordOverride>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keyword file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid keyword file {}", path.display()))
}

/// The static fallback table: built-in replies merged with configured ones.
///
/// Iteration order is match order. An override whose keyword equals a
/// built-in keyword exactly replaces that reply in place; other overrides are
/// appended in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(String, String)>,
}

impl KeywordTable {
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_KEYWORD_RESPONSES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (keyword, response) in pairs {
            table.insert(keyword.into(), response.into());
        }
        table
    }

    pub fn insert(&mut self, keyword: String, response: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
            Some(slot) => slot.1 = response,
            None => self.entries.push((keyword, response)),
        }
    }

    pub fn merge(mut self, overrides: impl IntoIterator<Item = KeywordOverride>) -> Self {
        for item in overrides {
            self.insert(item.keyword, item.response);
        }
        self
    }

    /// Built-in table plus the optional override file.
    pub fn load(override_file: Option<&Path>) -> Result<Self> {
        let table = Self::builtin();
        match override_file {
            Some(path) => Ok(table.merge(load_overrides(path)?)),
            None => Ok(table),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_replaces_in_place() {
        let table = KeywordTable::from_pairs([("a", "1"), ("b", "2")]).merge([
            KeywordOverride { keyword: "a".into(), response: "one".into() },
            KeywordOverride { keyword: "c".into(), response: "3".into() },
        ]);

        let order: Vec<_> = table.iter().collect();
        assert_eq!(order, vec![("a", "one"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn test_collision_is_exact_not_substring() {
        let table = KeywordTable::from_pairs([("谢谢", "不客气")]).merge([KeywordOverride {
            keyword: "谢谢你".into(),
            response: "别客气".into(),
        }]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("谢谢"), Some("不客气"));
        assert_eq!(table.get("谢谢你"), Some("别客气"));
    }

    #[test]
    fn test_builtin_has_defaults() {
        let table = KeywordTable::builtin();
        assert_eq!(table.len(), DEFAULT_KEYWORD_RESPONSES.len());
        assert_eq!(table.get("你好"), Some("你好呀！有什么我可以帮忙的吗？"));
    }

    #[test]
    fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(
            &path,
            r#"[{"keyword": "hello", "response": "Hey!"}, {"keyword": "验群", "response": "本群为官方认证群"}]"#,
        )
        .unwrap();

        let table = KeywordTable::load(Some(&path)).unwrap();
        assert_eq!(table.get("hello"), Some("Hey!"));
        assert_eq!(table.get("验群"), Some("本群为官方认证群"));
        assert_eq!(table.len(), DEFAULT_KEYWORD_RESPONSES.len() + 1);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = KeywordTable::load(Some(Path::new("/nonexistent/keywords.json")));
        assert!(result.is_err());
    }
}
