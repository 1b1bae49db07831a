use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html::escape;

use crate::bot::context::AppContext;
use crate::bot::keyboards;
use crate::bot::state::HandlerResult;
use crate::database::models::{Group, MessageLog, NewMessageLog};
use crate::utils::logging::log_database_error;
use crate::utils::validation::extract_group_number;

pub fn format_group_card(group: &Group) -> String {
    let link = escape(&group.link);
    format!(
        "<b>{}</b>\n<b>{}</b>\n\n<a href=\"{}\">{}</a>\n\n<b>Telegram</b>\n公群{} {}\n",
        group.category(),
        escape(&group.group_number),
        link,
        link,
        escape(&group.group_number),
        escape(group.description.as_deref().unwrap_or_default())
    )
}

pub fn format_number_not_found(number: &str) -> String {
    format!(
        "<b>❌ 未找到编号为【{}】的群组。</b>\n\n\
         请确认编号是否正确，或尝试使用以下方式找到群组：\n\
         1. 输入关键词如：好旺、卡商、代收、白资等\n\
         2. 联系客服了解更多群组：@kefu",
        escape(number)
    )
}

pub fn format_search_results(keyword: &str, groups: &[Group]) -> String {
    let mut text = format!("<b>🔍 关键词「{}」搜索结果：</b>\n\n", escape(keyword));
    for (idx, group) in groups.iter().enumerate() {
        text.push_str(&format!(
            "<b>{}. {}</b> (编号: {})\n   {}\n\n",
            idx + 1,
            escape(&group.name),
            escape(&group.group_number),
            escape(group.description.as_deref().unwrap_or_default())
        ));
    }
    text
}

pub fn format_search_not_found(keyword: &str) -> String {
    format!(
        "<b>❌ 未找到与「{}」相关的群组。</b>\n\n\
         您可以：\n\
         1. 尝试使用其他关键词，如：卡商、代收、白资等\n\
         2. 直接发送群组编号，格式如：【123】\n\
         3. 联系客服获取帮助：@kefu",
        escape(keyword)
    )
}

async fn lookup_by_number(bot: &Bot, msg: &Message, number: &str, ctx: &AppContext) -> HandlerResult {
    let group = match Group::find_by_number(&ctx.db.pool, number).await {
        Ok(group) => group,
        Err(e) => {
            log_database_error("SELECT", "groups", &e.to_string(), Some(number));
            None
        }
    };

    let Some(group) = group else {
        bot.send_message(msg.chat.id, format_number_not_found(number))
            .parse_mode(ParseMode::Html)
            .reply_to_message_id(msg.id)
            .reply_markup(keyboards::not_found_menu())
            .await?;
        tracing::info!("Lookup of unknown group number {}", number);
        return Ok(());
    };

    bot.send_message(msg.chat.id, format_group_card(&group))
        .parse_mode(ParseMode::Html)
        .reply_to_message_id(msg.id)
        .await?;
    tracing::info!("Group number {} resolved to '{}'", number, group.name);

    let entry = NewMessageLog {
        chat_id: msg.chat.id.0,
        chat_type: "private".to_string(),
        user_id: msg.from().map(|u| u.id.0 as i64),
        username: msg.from().and_then(|u| u.username.clone()),
        message_text: Some(format!("查询群组编号:{number}")),
        ..Default::default()
    };
    if let Err(e) = MessageLog::insert(&ctx.db.pool, entry).await {
        log_database_error("INSERT", "message_logs", &e.to_string(), None);
    }
    Ok(())
}

async fn search_directory(bot: &Bot, msg: &Message, keyword: &str, ctx: &AppContext) -> HandlerResult {
    let groups = match Group::search(&ctx.db.pool, keyword).await {
        Ok(groups) => groups,
        Err(e) => {
            log_database_error("SELECT", "groups", &e.to_string(), Some(keyword));
            Vec::new()
        }
    };

    if groups.is_empty() {
        bot.send_message(msg.chat.id, format_search_not_found(keyword))
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboards::not_found_menu())
            .await?;
        tracing::info!("Directory search for '{}' found nothing", keyword);
        return Ok(());
    }

    let menu = keyboards::search_results_menu(groups.iter().map(|g| (g.name.as_str(), g.link.as_str())));
    bot.send_message(msg.chat.id, format_search_results(keyword, &groups))
        .parse_mode(ParseMode::Html)
        .reply_markup(menu)
        .await?;
    tracing::info!("Directory search for '{}' found {} groups", keyword, groups.len());
    Ok(())
}

/// Private text: group number lookup, then keyword reply, then directory search.
pub async fn handle_private_text(bot: Bot, msg: Message, ctx: AppContext) -> HandlerResult {
    let Some(text) = msg.text().map(str::trim) else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }

    let user = msg
        .from()
        .map(|u| u.username.as_ref().map_or_else(|| u.first_name.clone(), |name| format!("@{name}")))
        .unwrap_or_else(|| "未知用户".to_string());
    tracing::info!("Private query from {}: '{}'", user, text);

    if let Some(number) = extract_group_number(text) {
        return lookup_by_number(&bot, &msg, &number, &ctx).await;
    }

    if let Some(response) = ctx.resolver.resolve(text).await {
        bot.send_message(msg.chat.id, response).await?;
        return Ok(());
    }

    search_directory(&bot, &msg, text, &ctx).await
}
