use chrono::Local;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use crate::bot::commands::{self, start, stats};
use crate::bot::content;
use crate::bot::context::AppContext;
use crate::bot::keyboards::{self, CallbackAction, MutePreset};
use crate::bot::permissions::is_user_admin;
use crate::bot::state::HandlerResult;
use crate::utils::logging::log_permission_denied;

/// What a button press turns the panel message into.
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub markup: Option<InlineKeyboardMarkup>,
    pub html: bool,
}

impl Screen {
    fn html(text: impl Into<String>, markup: InlineKeyboardMarkup) -> Self {
        Self { text: text.into(), markup: Some(markup), html: true }
    }
}

const ADMIN_HELP_TEXT: &str = "❓ <b>管理员帮助</b> ❓\n\n\
本机器人提供以下管理员功能：\n\n\
• 📊 <b>群组统计</b> - 查看群组的详细统计信息\n\
• 🚫 <b>封禁用户</b> - 将用户从群组中移除并禁止其重新加入\n\
• ⚠️ <b>警告用户</b> - 向用户发出警告，多次警告后可执行其他操作\n\
• 🔇 <b>禁言用户</b> - 临时限制用户在群组中发言\n\
• 📝 <b>群组规则</b> - 设置和管理群组规则\n\
• 🔨 <b>清理消息</b> - 批量删除群组中的消息\n\n\
使用 /admin 命令可随时访问此管理面板。";

const MUTE_MENU_TEXT: &str = "🔇 <b>禁言用户</b>\n\n\
请选择禁言时长，然后回复要禁言的用户消息。\n\
或者可以使用命令： <code>/mute 用户ID 时长</code>\n\
例如：<code>/mute 123456789 2h</code>\n\n\
时长单位：m(分钟)、h(小时)、d(天)";

/// Screens that need neither Telegram nor the database to render.
pub fn static_screen(action: CallbackAction) -> Option<Screen> {
    let screen = match action {
        CallbackAction::AdminBan => Screen::html(
            "🚫 <b>封禁用户</b>\n\n请回复要封禁用户的消息发送 /ban，或指定用户ID。\n格式: <code>/ban 用户ID</code>",
            keyboards::back_to_admin(),
        ),
        CallbackAction::AdminWarn => Screen::html(
            "⚠️ <b>警告用户</b>\n\n此功能正在开发中，即将推出。\n您将能够向用户发送正式警告，并跟踪警告次数。",
            keyboards::back_to_admin(),
        ),
        CallbackAction::AdminMute => Screen::html(MUTE_MENU_TEXT, keyboards::mute_menu()),
        CallbackAction::AdminRules => Screen::html(
            "📝 <b>群组规则</b>\n\n此功能正在开发中，即将推出。\n您将能够设置和管理群组规则，用户可以通过命令查看。",
            keyboards::back_to_admin(),
        ),
        CallbackAction::AdminClean => Screen::html(
            "🔨 <b>清理消息</b>\n\n此功能正在开发中，即将推出。\n您将能够批量删除群组中的消息，帮助维护群组秩序。",
            keyboards::back_to_admin(),
        ),
        CallbackAction::AdminHelp => Screen::html(ADMIN_HELP_TEXT, keyboards::back_to_admin()),
        CallbackAction::AdminBack => Screen::html(keyboards::ADMIN_PANEL_TEXT, keyboards::admin_panel()),
        CallbackAction::Mute(MutePreset::Custom) => Screen::html(
            "🔇 <b>自定义禁言时长</b>\n\n请直接使用命令设置禁言：\n<code>/mute 用户ID 时长</code>\n\n时长格式示例：\n- <code>5m</code> (5分钟)\n- <code>2h</code> (2小时)\n- <code>1d</code> (1天)",
            keyboards::back_to_mute_menu(),
        ),
        CallbackAction::Mute(preset) => Screen::html(
            format!(
                "🔇 <b>禁言用户 {}</b>\n\n请回复要禁言用户的消息并发送：\n<code>/mute {}</code>",
                preset.label(),
                preset.command_arg().unwrap_or_default()
            ),
            keyboards::back_to_mute_menu(),
        ),
        CallbackAction::Unmute => Screen::html(
            "🔊 <b>解除禁言</b>\n\n请回复要解除禁言用户的消息并发送：\n<code>/unmute</code>",
            keyboards::back_to_mute_menu(),
        ),
        CallbackAction::VerifyPhone => Screen {
            text: "请使用 /verify 命令开始手机验证流程。".to_string(),
            markup: None,
            html: false,
        },
        CallbackAction::SearchGroup => Screen::html(
            "🔍 <b>搜索群组</b> 🔍\n\n您可以通过以下方式搜索群组：\n\n1. 直接发送群组编号 (例如: 999, 621)\n2. 发送关键词 (例如: 金融, 交易, 游戏)\n\n我们将为您找到最匹配的群组。",
            keyboards::back_to_main(),
        ),
        CallbackAction::HelpInfo => Screen {
            text: commands::help_text(),
            markup: Some(keyboards::back_to_main()),
            html: false,
        },
        CallbackAction::AdminStats | CallbackAction::MainMenu | CallbackAction::ViewChannels => {
            return None
        }
    };
    Some(screen)
}

async fn render(bot: &Bot, q: &CallbackQuery, action: CallbackAction, chat_id: ChatId, ctx: &AppContext) -> Screen {
    if let Some(screen) = static_screen(action) {
        return screen;
    }

    match action {
        CallbackAction::AdminStats => match stats::fetch_stats(bot, chat_id).await {
            Ok(group_stats) => Screen::html(stats::format_stats(&group_stats, Local::now()), keyboards::back_to_admin()),
            Err(e) => {
                tracing::error!("Stats error from panel: {}", e);
                Screen {
                    text: format!("获取统计信息失败：{e}"),
                    markup: Some(keyboards::back_to_admin()),
                    html: false,
                }
            }
        },
        CallbackAction::ViewChannels => {
            let info = content::channel_info(&ctx.db).await;
            let channels = content::channel_links(&ctx.db).await;
            Screen::html(
                info,
                keyboards::channels_menu(channels.iter().map(|c| (c.name.as_str(), c.link.as_str()))),
            )
        }
        _ => {
            let is_verified = start::lookup_verified(ctx, q.from.id).await;
            let intro = content::welcome_intro(&ctx.db).await;
            Screen::html(start::welcome_text(&intro, is_verified), keyboards::main_menu(is_verified))
        }
    }
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: AppContext) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let chat_id = message.chat.id;
    let username = q.from.username.clone().unwrap_or_else(|| q.from.first_name.clone());

    tracing::info!(
        "Callback received: '{}' from user {} ({}) in chat {}",
        data, username, q.from.id.0, chat_id.0
    );

    let Some(action) = CallbackAction::parse(data) else {
        tracing::warn!("Unknown callback data '{}'", data);
        return Ok(());
    };

    if action.requires_admin() && !is_user_admin(&bot, chat_id, q.from.id).await {
        log_permission_denied(data, &username, q.from.id.0, chat_id.0);
        bot.edit_message_text(chat_id, message.id, "抱歉，您不再是群组管理员，无法使用此功能。")
            .await?;
        return Ok(());
    }

    let screen = render(&bot, &q, action, chat_id, &ctx).await;
    let mut edit = bot
        .edit_message_text(chat_id, message.id, screen.text)
        .disable_web_page_preview(true);
    if screen.html {
        edit = edit.parse_mode(ParseMode::Html);
    }
    if let Some(markup) = screen.markup {
        edit = edit.reply_markup(markup);
    }
    edit.await?;
    Ok(())
}
