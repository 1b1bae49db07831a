use rand::Rng;
use teloxide::prelude::*;
use teloxide::types::{Me, User};

use crate::bot::context::AppContext;
use crate::bot::permissions::is_user_admin;
use crate::bot::state::HandlerResult;
use crate::database::models::{GroupChatSettings, MessageLog, NewMessageLog};
use crate::keywords::KeywordMatch;
use crate::utils::logging::{log_auto_reply, log_database_error, log_permission_denied};

pub const ADMIN_ONLY_NOTICE: &str = "抱歉，只有群组管理员可以使用机器人功能。";

/// Keyword any member may use to confirm the group is genuine.
const GROUP_CHECK_KEYWORD: &str = "验群";

/// Replies containing these read as system notices and are never prefixed
/// with the sender's name.
const SYSTEM_MARKERS: &[&str] = &["命令", "规则", "功能", "/", "使用", "禁言"];

const PERSONALIZE_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteToggle {
    Mute,
    Unmute,
}

/// Admin text that flips the group's muted flag, if any.
pub fn mute_toggle(text: &str) -> Option<MuteToggle> {
    let text = text.to_lowercase();
    if text.contains("禁言") && !text.contains("解除") {
        Some(MuteToggle::Mute)
    } else if text.contains("解除禁言") {
        Some(MuteToggle::Unmute)
    } else {
        None
    }
}

/// What the bot does with a group message that matched a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDecision {
    Reply,
    Refuse,
    Silent,
}

/// Admins always get the reply. Other members get it only for the group
/// check keyword; otherwise a refusal, unless the group is muted.
pub fn reply_decision(is_admin: bool, text: &str, muted: bool) -> ReplyDecision {
    if is_admin || text.contains(GROUP_CHECK_KEYWORD) {
        ReplyDecision::Reply
    } else if muted {
        ReplyDecision::Silent
    } else {
        ReplyDecision::Refuse
    }
}

pub fn should_personalize(response: &str) -> bool {
    !SYSTEM_MARKERS.iter().any(|marker| response.contains(marker))
}

pub fn personalize(first_name: &str, response: &str) -> String {
    format!("{first_name}，{response}")
}

pub fn welcome_message(first_name: &str, username: Option<&str>, chat_title: &str) -> String {
    let mut text = format!("欢迎 {first_name} 加入 {chat_title}！👋");
    if let Some(username) = username {
        text.push_str(&format!("\n您可以通过 @{username} 被提及"));
    }
    text.push_str("\n\n请阅读群组规则并享受您的时光！");
    text
}

async fn log_reply(ctx: &AppContext, msg: &Message, user: &User, text: &str, hit: &KeywordMatch, is_admin: bool) {
    let entry = NewMessageLog {
        chat_id: msg.chat.id.0,
        chat_type: if msg.chat.is_supergroup() { "supergroup" } else { "group" }.to_string(),
        chat_title: msg.chat.title().map(str::to_string),
        user_id: Some(user.id.0 as i64),
        username: user.username.clone(),
        message_text: Some(text.to_string()),
        trigger_keyword: Some(hit.keyword.clone()),
        is_admin,
    };
    if let Err(e) = MessageLog::insert(&ctx.db.pool, entry).await {
        log_database_error("INSERT", "message_logs", &e.to_string(), None);
    }
}

async fn apply_mute_toggle(ctx: &AppContext, msg: &Message, admin: &User, toggle: MuteToggle) {
    let muted = toggle == MuteToggle::Mute;
    match GroupChatSettings::set_muted(&ctx.db.pool, msg.chat.id.0, msg.chat.title(), muted, admin.id.0 as i64).await {
        Ok(_) => tracing::info!(
            "Group {} ({}) {} by admin {}",
            msg.chat.title().unwrap_or_default(),
            msg.chat.id.0,
            if muted { "muted" } else { "unmuted" },
            admin.id.0
        ),
        Err(e) => log_database_error("UPSERT", "group_chat_settings", &e.to_string(), None),
    }
}

/// Keyword auto-reply in groups, see [`reply_decision`].
pub async fn auto_reply(bot: Bot, msg: Message, ctx: AppContext) -> HandlerResult {
    let (Some(text), Some(user)) = (msg.text(), msg.from()) else {
        return Ok(());
    };

    let Some(hit) = ctx.resolver.resolve_match(text).await else {
        return Ok(());
    };

    let name = user.username.clone().unwrap_or_else(|| user.first_name.clone());
    let is_admin = is_user_admin(&bot, msg.chat.id, user.id).await;

    if is_admin {
        if let Some(toggle) = mute_toggle(text) {
            apply_mute_toggle(&ctx, &msg, user, toggle).await;
        }
    }

    // admins never need the flag, so skip the query for them
    let muted = !is_admin
        && match GroupChatSettings::is_muted(&ctx.db.pool, msg.chat.id.0).await {
            Ok(muted) => muted,
            Err(e) => {
                log_database_error("SELECT", "group_chat_settings", &e.to_string(), None);
                false
            }
        };

    match reply_decision(is_admin, text, muted) {
        ReplyDecision::Reply => {
            let mut response = hit.response.clone();
            if is_admin
                && should_personalize(&response)
                && rand::thread_rng().gen_bool(PERSONALIZE_PROBABILITY)
            {
                response = personalize(&user.first_name, &response);
            }

            bot.send_message(msg.chat.id, response)
                .reply_to_message_id(msg.id)
                .await?;
            log_auto_reply(&hit.keyword, &name, user.id.0, msg.chat.id.0, is_admin);
            log_reply(&ctx, &msg, user, text, &hit, is_admin).await;
        }
        ReplyDecision::Refuse => {
            log_permission_denied("auto-reply", &name, user.id.0, msg.chat.id.0);
            bot.send_message(msg.chat.id, ADMIN_ONLY_NOTICE)
                .reply_to_message_id(msg.id)
                .await?;
        }
        ReplyDecision::Silent => {}
    }
    Ok(())
}

pub async fn welcome_new_members(bot: Bot, msg: Message, members: Vec<User>, me: Me) -> HandlerResult {
    let chat_title = msg.chat.title().unwrap_or("本群");

    for member in members.iter().filter(|m| m.id != me.id) {
        bot.send_message(
            msg.chat.id,
            welcome_message(&member.first_name, member.username.as_deref(), chat_title),
        )
        .await?;
        tracing::info!(
            "Welcomed new member: {} ({}) to {}",
            member.first_name,
            member.id.0,
            chat_title
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_toggle() {
        assert_eq!(mute_toggle("全体禁言"), Some(MuteToggle::Mute));
        assert_eq!(mute_toggle("解除禁言"), Some(MuteToggle::Unmute));
        assert_eq!(mute_toggle("现在解除全部"), None);
        assert_eq!(mute_toggle("你好"), None);
    }

    #[test]
    fn test_admins_always_get_the_reply() {
        assert_eq!(reply_decision(true, "你好", false), ReplyDecision::Reply);
        assert_eq!(reply_decision(true, "你好", true), ReplyDecision::Reply);
        assert_eq!(reply_decision(true, "验群", true), ReplyDecision::Reply);
    }

    #[test]
    fn test_members_get_the_reply_only_for_group_check() {
        assert_eq!(reply_decision(false, "帮我验群", false), ReplyDecision::Reply);
        assert_eq!(reply_decision(false, "帮我验群", true), ReplyDecision::Reply);
    }

    #[test]
    fn test_members_are_refused_unless_group_is_muted() {
        assert_eq!(reply_decision(false, "你好", false), ReplyDecision::Refuse);
        assert_eq!(reply_decision(false, "你好", true), ReplyDecision::Silent);
    }

    #[test]
    fn test_should_personalize_skips_system_replies() {
        assert!(should_personalize("您好！有什么可以帮助您的吗？"));
        assert!(!should_personalize("请使用 /help 查看命令"));
        assert!(!should_personalize("本群已禁言"));
        assert_eq!(personalize("小明", "早上好"), "小明，早上好");
    }

    #[test]
    fn test_welcome_message() {
        assert_eq!(
            welcome_message("Alice", Some("alice"), "好旺公群"),
            "欢迎 Alice 加入 好旺公群！👋\n您可以通过 @alice 被提及\n\n请阅读群组规则并享受您的时光！"
        );
        assert!(!welcome_message("Bob", None, "好旺公群").contains('@'));
    }
}
