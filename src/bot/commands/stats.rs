use chrono::{DateTime, Local};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html::escape;

use crate::bot::commands::moderation::require_group_admin;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_success};

/// Snapshot of a group as reported by Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub title: String,
    pub member_count: u32,
    pub is_supergroup: bool,
    pub chat_id: i64,
}

pub fn format_stats(stats: &GroupStats, generated_at: DateTime<Local>) -> String {
    format!(
        "📊 <b>群组统计信息</b> 📊\n\n\
         <b>群组名称:</b> {}\n\
         <b>群组成员:</b> {} 人\n\
         <b>群组类型:</b> {}\n\
         <b>群组ID:</b> <code>{}</code>\n\n\
         <b>生成时间:</b> {}",
        escape(&stats.title),
        stats.member_count,
        if stats.is_supergroup { "超级群组" } else { "普通群组" },
        stats.chat_id,
        generated_at.format("%Y年%m月%d日 %H:%M:%S")
    )
}

pub async fn fetch_stats(bot: &Bot, chat_id: ChatId) -> ResponseResult<GroupStats> {
    let chat = bot.get_chat(chat_id).await?;
    let member_count = bot.get_chat_member_count(chat_id).await?;

    Ok(GroupStats {
        title: chat.title().unwrap_or("未命名群组").to_string(),
        member_count,
        is_supergroup: chat.is_supergroup(),
        chat_id: chat_id.0,
    })
}

pub async fn handle_stats(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(admin) = require_group_admin(&bot, &msg, "/stats").await? else {
        return Ok(());
    };
    let admin_name = admin.username.clone().unwrap_or_else(|| admin.first_name.clone());

    match fetch_stats(&bot, msg.chat.id).await {
        Ok(stats) => {
            bot.send_message(msg.chat.id, format_stats(&stats, Local::now()))
                .parse_mode(ParseMode::Html)
                .await?;
            log_command_success("/stats", &admin_name, admin.id.0, msg.chat.id.0, None);
        }
        Err(e) => {
            log_command_error("/stats", &admin_name, admin.id.0, msg.chat.id.0, &e.to_string());
            CommandFeedback::new(bot, msg.chat.id)
                .error(&format!("获取统计信息失败：{e}"))
                .await?;
        }
    }
    Ok(())
}
