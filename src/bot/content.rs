//! Menu texts and channel list: stored values first, built-in copy otherwise.

use crate::database::connection::DatabaseManager;
use crate::database::models::{BotSettings, Channel};
use crate::utils::logging::log_database_error;

pub const DEFAULT_WELCOME_INTRO: &str = "👋 <b>欢迎使用好旺公群管理机器人！</b> 👋\n\n\
这是一款功能强大的群组管理工具，可以帮助您搜索公群、验证群组真实性，并提供丰富的群管理功能。\n\n\
您可以直接发送群组编号或关键词来搜索相关群组。\n";

pub const DEFAULT_CHANNEL_INFO: &str = "📢 <b>官方频道</b> 📢\n\n\
以下是我们的官方频道，点击按钮即可加入。\n\
请关注以上频道获取最新消息与公告。";

/// `(name, username)` in display order.
pub const DEFAULT_CHANNELS: &[(&str, &str)] = &[
    ("好旺公群", "hwgq"),
    ("供求信息", "hwtb2"),
    ("新开公群", "xinqun"),
    ("核心大群", "daqun"),
    ("防骗指南", "hwtb22"),
    ("担保教程", "hwtb33"),
    ("联系好旺担保", "hwdb"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLink {
    pub name: String,
    pub link: String,
}

pub fn default_channel_links() -> Vec<ChannelLink> {
    DEFAULT_CHANNELS
        .iter()
        .map(|(name, username)| ChannelLink {
            name: name.to_string(),
            link: format!("https://t.me/{username}"),
        })
        .collect()
}

/// Stored settings text if set and non-blank.
fn stored_text(
    settings: Result<Option<BotSettings>, sqlx::Error>,
    pick: fn(BotSettings) -> Option<String>,
) -> Option<String> {
    match settings {
        Ok(settings) => settings.and_then(pick).filter(|text| !text.trim().is_empty()),
        Err(e) => {
            log_database_error("SELECT", "bot_settings", &e.to_string(), None);
            None
        }
    }
}

/// Stored channels, or the built-in list when the table is empty or unreadable.
pub fn channels_or_default(rows: Result<Vec<Channel>, sqlx::Error>) -> Vec<ChannelLink> {
    match rows {
        Ok(rows) if !rows.is_empty() => rows
            .into_iter()
            .map(|c| ChannelLink { name: c.name, link: c.link })
            .collect(),
        Ok(_) => default_channel_links(),
        Err(e) => {
            log_database_error("SELECT", "channels", &e.to_string(), None);
            default_channel_links()
        }
    }
}

pub async fn welcome_intro(db: &DatabaseManager) -> String {
    stored_text(BotSettings::load(&db.pool).await, |s| s.private_chat_welcome)
        .unwrap_or_else(|| DEFAULT_WELCOME_INTRO.to_string())
}

pub async fn channel_info(db: &DatabaseManager) -> String {
    stored_text(BotSettings::load(&db.pool).await, |s| s.channel_info)
        .unwrap_or_else(|| DEFAULT_CHANNEL_INFO.to_string())
}

pub async fn channel_links(db: &DatabaseManager) -> Vec<ChannelLink> {
    channels_or_default(Channel::list_ordered(&db.pool).await)
}
