//! Keyword auto-replies: stored entries first, static table as fallback.

pub mod defaults;
pub mod resolver;
pub mod table;

pub use resolver::{KeywordEntry, KeywordMatch, KeywordResolver, KeywordSource, MatchSource};
pub use table::{load_overrides, KeywordOverride, KeywordTable};
