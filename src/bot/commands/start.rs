use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::content;
use crate::bot::context::AppContext;
use crate::bot::keyboards;
use crate::database::models::PhoneVerification;
use crate::utils::logging::log_database_error;

pub const GROUP_GREETING: &str = "欢迎使用好旺公群管理机器人！你可以使用 /help 查看可用命令。\n\
群管理员可使用 /admin 命令访问管理面板。";

/// Private-chat welcome, HTML formatted: `intro` plus verification status.
pub fn welcome_text(intro: &str, is_verified: bool) -> String {
    let mut text = String::from(intro);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(if is_verified {
        "手机验证状态: ✅ 已验证\n\n"
    } else {
        "手机验证状态: ❌ 未验证\n\n"
    });

    if !is_verified {
        text.push_str(
            "🔐 <b>需要验证</b> 🔐\n\
             为了使用完整功能并保障您的账号安全，请使用 /verify 命令完成手机号验证。\n\n",
        );
    }

    text.push_str("使用 /help 查看所有可用命令。");
    text
}

/// Verification status for the welcome screen; database errors read as unverified.
pub async fn lookup_verified(ctx: &AppContext, user_id: UserId) -> bool {
    match PhoneVerification::is_user_verified(&ctx.db.pool, user_id.0 as i64).await {
        Ok(verified) => verified,
        Err(e) => {
            log_database_error("SELECT", "phone_verifications", &e.to_string(), None);
            false
        }
    }
}

pub async fn handle_start(bot: Bot, msg: Message, ctx: &AppContext) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        bot.send_message(msg.chat.id, GROUP_GREETING).await?;
        return Ok(());
    }

    let is_verified = match msg.from() {
        Some(user) => lookup_verified(ctx, user.id).await,
        None => false,
    };

    let intro = content::welcome_intro(&ctx.db).await;
    bot.send_message(msg.chat.id, welcome_text(&intro, is_verified))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::main_menu(is_verified))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_prompts_unverified_users() {
        let text = welcome_text(content::DEFAULT_WELCOME_INTRO, false);
        assert!(text.contains("❌ 未验证"));
        assert!(text.contains("/verify"));
    }

    #[test]
    fn test_welcome_for_verified_users() {
        let text = welcome_text(content::DEFAULT_WELCOME_INTRO, true);
        assert!(text.contains("✅ 已验证"));
        assert!(!text.contains("需要验证"));
    }

    #[test]
    fn test_custom_intro_keeps_status_line() {
        let text = welcome_text("<b>好旺公群</b>", true);
        assert!(text.starts_with("<b>好旺公群</b>\n"));
        assert!(text.contains("✅ 已验证"));
    }
}
