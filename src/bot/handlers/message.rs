use teloxide::prelude::*;

use crate::bot::commands::{self, moderation, start, stats, verify, Command};
use crate::bot::context::AppContext;
use crate::bot::keyboards;
use crate::bot::state::{HandlerResult, VerifyDialogue};
use crate::utils::logging::log_command_start;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: VerifyDialogue,
    ctx: AppContext,
) -> HandlerResult {
    ctx.status.record_message();

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, commands::help_text()).await?;
        }
        Command::Start => {
            start::handle_start(bot, msg, &ctx).await?;
        }
        Command::Verify => {
            verify::start_verification(bot, msg, dialogue, &ctx).await?;
        }
        Command::Cancel => {
            verify::cancel(bot, msg, dialogue).await?;
        }
        Command::Ban(args) => {
            moderation::handle_ban(bot, msg, args).await?;
        }
        Command::Mute(args) => {
            moderation::handle_mute(bot, msg, args).await?;
        }
        Command::Unmute(args) => {
            moderation::handle_unmute(bot, msg, args).await?;
        }
        Command::Stats => {
            stats::handle_stats(bot, msg).await?;
        }
        Command::Admin => {
            handle_admin(bot, msg).await?;
        }
    }
    Ok(())
}

async fn handle_admin(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(admin) = moderation::require_group_admin(&bot, &msg, "/admin").await? else {
        return Ok(());
    };
    let admin_name = admin.username.clone().unwrap_or_else(|| admin.first_name.clone());
    log_command_start("/admin", &admin_name, admin.id.0, msg.chat.id.0, None);

    bot.send_message(msg.chat.id, keyboards::ADMIN_PANEL_TEXT)
        .parse_mode(teloxide::types::ParseMode::Html)
        .reply_markup(keyboards::admin_panel())
        .await?;
    Ok(())
}
