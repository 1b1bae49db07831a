use chrono::{Duration, Utc};
use teloxide::prelude::*;
use teloxide::types::ChatPermissions;

use crate::bot::permissions::is_user_admin;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_permission_denied,
};
use crate::utils::validation::{
    format_mute_duration, parse_mute_duration, parse_target_user, TargetUser,
    DEFAULT_MUTE_DURATION_SECS,
};

pub const GROUP_ONLY: &str = "此命令只能在群组中使用。";
pub const ADMIN_ONLY: &str = "抱歉，只有群组管理员可以使用此命令。";

/// Parsed arguments of `/ban`, `/mute` and `/unmute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationArgs {
    pub target: TargetUser,
    pub duration: Option<String>,
}

/// When the command replies to a message, that message's author is the
/// target and every argument is the duration. Otherwise the first argument
/// names the target.
pub fn parse_moderation_args(args: &str, replied_user: Option<u64>) -> Option<ModerationArgs> {
    let mut parts = args.split_whitespace();

    if let Some(user_id) = replied_user {
        return Some(ModerationArgs {
            target: TargetUser::Id(user_id),
            duration: parts.next().map(str::to_string),
        });
    }

    let target = parse_target_user(parts.next()?).ok()?;
    Some(ModerationArgs {
        target,
        duration: parts.next().map(str::to_string),
    })
}

pub fn muted_permissions() -> ChatPermissions {
    ChatPermissions::INVITE_USERS
}

pub fn restored_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_MEDIA_MESSAGES
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
        | ChatPermissions::INVITE_USERS
}

fn unresolvable_username(name: &str) -> String {
    format!("无法通过用户名 @{name} 找到用户。请使用数字用户ID，或回复该用户的消息后再执行命令。")
}

/// Group-only, admin-only gate shared by the moderation and panel commands.
/// Returns the caller when the command may proceed.
pub async fn require_group_admin<'a>(
    bot: &Bot,
    msg: &'a Message,
    command: &str,
) -> ResponseResult<Option<&'a teloxide::types::User>> {
    let Some(user) = msg.from() else {
        return Ok(None);
    };

    if msg.chat.is_private() || msg.chat.is_channel() {
        bot.send_message(msg.chat.id, GROUP_ONLY).await?;
        return Ok(None);
    }

    if !is_user_admin(bot, msg.chat.id, user.id).await {
        let name = user.username.clone().unwrap_or_else(|| user.first_name.clone());
        log_permission_denied(command, &name, user.id.0, msg.chat.id.0);
        bot.send_message(msg.chat.id, ADMIN_ONLY).await?;
        return Ok(None);
    }

    Ok(Some(user))
}

fn replied_user_id(msg: &Message) -> Option<u64> {
    msg.reply_to_message()
        .and_then(|reply| reply.from())
        .map(|user| user.id.0)
}

/// Resolves the target or explains to the admin why it could not be used.
async fn target_or_usage(
    feedback: &CommandFeedback,
    msg: &Message,
    args: &str,
    usage: &str,
) -> ResponseResult<Option<(UserId, Option<String>)>> {
    match parse_moderation_args(args, replied_user_id(msg)) {
        Some(ModerationArgs { target: TargetUser::Id(id), duration }) => Ok(Some((UserId(id), duration))),
        Some(ModerationArgs { target: TargetUser::Username(name), .. }) => {
            feedback.warning(&unresolvable_username(&name)).await?;
            Ok(None)
        }
        None => {
            feedback.info(usage).await?;
            Ok(None)
        }
    }
}

pub async fn handle_ban(bot: Bot, msg: Message, args: String) -> ResponseResult<()> {
    let Some(admin) = require_group_admin(&bot, &msg, "/ban").await? else {
        return Ok(());
    };
    let admin_name = admin.username.clone().unwrap_or_else(|| admin.first_name.clone());
    log_command_start("/ban", &admin_name, admin.id.0, msg.chat.id.0, Some(&args));

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some((target, _)) = target_or_usage(
        &feedback,
        &msg,
        &args,
        "请输入要封禁的用户ID。\n使用方法: /ban 用户ID，或回复该用户的消息发送 /ban",
    )
    .await?
    else {
        return Ok(());
    };

    match bot.ban_chat_member(msg.chat.id, target).await {
        Ok(_) => {
            log_command_success("/ban", &admin_name, admin.id.0, msg.chat.id.0, Some(&target.0.to_string()));
            feedback.success(&format!("已成功封禁用户ID {}。", target.0)).await?;
        }
        Err(e) => {
            log_command_error("/ban", &admin_name, admin.id.0, msg.chat.id.0, &e.to_string());
            feedback.error(&format!("封禁用户失败：{e}")).await?;
        }
    }
    Ok(())
}

pub async fn handle_mute(bot: Bot, msg: Message, args: String) -> ResponseResult<()> {
    let Some(admin) = require_group_admin(&bot, &msg, "/mute").await? else {
        return Ok(());
    };
    let admin_name = admin.username.clone().unwrap_or_else(|| admin.first_name.clone());
    log_command_start("/mute", &admin_name, admin.id.0, msg.chat.id.0, Some(&args));

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some((target, duration_arg)) = target_or_usage(
        &feedback,
        &msg,
        &args,
        "使用方法: /mute 用户ID [时长]\n例如: /mute 123456789 60m\n时长单位: m(分钟)、h(小时)、d(天)",
    )
    .await?
    else {
        return Ok(());
    };

    let duration = match duration_arg.as_deref().map(parse_mute_duration) {
        None => Duration::seconds(DEFAULT_MUTE_DURATION_SECS),
        Some(Ok(duration)) => duration,
        Some(Err(_)) => {
            feedback
                .warning("时长格式错误，将使用默认时长(1小时)。\n正确格式如: 30m, 2h, 1d")
                .await?;
            Duration::seconds(DEFAULT_MUTE_DURATION_SECS)
        }
    };

    let result = bot
        .restrict_chat_member(msg.chat.id, target, muted_permissions())
        .until_date(Utc::now() + duration)
        .await;

    let display = format_mute_duration(duration);
    match result {
        Ok(_) => {
            log_command_success(
                "/mute",
                &admin_name,
                admin.id.0,
                msg.chat.id.0,
                Some(&format!("{} for {}", target.0, display)),
            );
            feedback
                .success(&format!("已成功禁言用户ID {} {}。", target.0, display))
                .await?;
        }
        Err(e) => {
            log_command_error("/mute", &admin_name, admin.id.0, msg.chat.id.0, &e.to_string());
            feedback.error(&format!("禁言用户失败：{e}")).await?;
        }
    }
    Ok(())
}

pub async fn handle_unmute(bot: Bot, msg: Message, args: String) -> ResponseResult<()> {
    let Some(admin) = require_group_admin(&bot, &msg, "/unmute").await? else {
        return Ok(());
    };
    let admin_name = admin.username.clone().unwrap_or_else(|| admin.first_name.clone());
    log_command_start("/unmute", &admin_name, admin.id.0, msg.chat.id.0, Some(&args));

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some((target, _)) = target_or_usage(
        &feedback,
        &msg,
        &args,
        "使用方法: /unmute 用户ID，或回复该用户的消息发送 /unmute",
    )
    .await?
    else {
        return Ok(());
    };

    match bot
        .restrict_chat_member(msg.chat.id, target, restored_permissions())
        .await
    {
        Ok(_) => {
            log_command_success("/unmute", &admin_name, admin.id.0, msg.chat.id.0, Some(&target.0.to_string()));
            feedback
                .success(&format!("已成功解除用户ID {} 的禁言。", target.0))
                .await?;
        }
        Err(e) => {
            log_command_error("/unmute", &admin_name, admin.id.0, msg.chat.id.0, &e.to_string());
            feedback.error(&format!("解除禁言失败：{e}")).await?;
        }
    }
    Ok(())
}
