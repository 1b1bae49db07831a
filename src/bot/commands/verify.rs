use chrono::DateTime;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::context::AppContext;
use crate::bot::state::{HandlerResult, VerifyDialogue, VerifyState};
use crate::database::models::PhoneVerification;
use crate::utils::feedback::{format_validation_error, CommandFeedback};
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_database_error,
    log_validation_error,
};
use crate::utils::validation::{validate_phone_number, validate_verification_code};
use crate::verification::{IssuedCode, VerificationError};

const CANCEL_HINT: &str = "输入 /cancel 可取消验证流程。";

const PHONE_PROMPT: &str = "📱 <b>手机号验证</b> 📱\n\n\
为提高安全性并防止滥用，我们需要验证您的手机号码。\n\n\
请按以下格式输入您的手机号码：\n\
<code>+国家代码电话号码</code>\n\n\
例如：\n\
- 中国大陆: <code>+8613812345678</code>\n\
- 香港: <code>+85261234567</code>\n\
- 台湾: <code>+886912345678</code>\n\n\
输入 /cancel 可取消验证流程。";

/// `verification_date` as stored (RFC 3339) rendered for chat, `未知` if absent.
pub fn format_verification_date(stored: Option<&str>) -> String {
    stored
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "未知".to_string())
}

pub fn already_verified_text(record: &PhoneVerification) -> String {
    format!(
        "✅ 您已经完成了手机号验证，无需重复验证。\n\n验证手机: {}\n验证时间: {}",
        record.phone_number,
        format_verification_date(record.verification_date.as_deref())
    )
}

/// State after a phone number was submitted: a delivered code moves on to
/// code entry, any failure keeps asking for a number.
pub fn state_after_issue(outcome: &Result<IssuedCode, VerificationError>) -> VerifyState {
    match outcome {
        Ok(issued) => VerifyState::AwaitingCode {
            phone: issued.phone.clone(),
        },
        Err(_) => VerifyState::AwaitingPhone,
    }
}

/// State after a code was submitted, `None` once the dialogue is over.
///
/// A wrong code may be retried. An expired or unknown one can only be fixed
/// by issuing a new code, so the number is asked for again.
pub fn state_after_code(
    outcome: &Result<String, VerificationError>,
    phone: &str,
) -> Option<VerifyState> {
    match outcome {
        Ok(_) => None,
        Err(VerificationError::Mismatch) => Some(VerifyState::AwaitingCode {
            phone: phone.to_string(),
        }),
        Err(_) => Some(VerifyState::AwaitingPhone),
    }
}

async fn transition(dialogue: &VerifyDialogue, next: Option<VerifyState>) -> HandlerResult {
    match next {
        Some(state) => dialogue.update(state).await?,
        None => dialogue.exit().await?,
    }
    Ok(())
}

fn display_name(user: &teloxide::types::User) -> String {
    user.username.clone().unwrap_or_else(|| user.first_name.clone())
}

pub async fn start_verification(
    bot: Bot,
    msg: Message,
    dialogue: VerifyDialogue,
    ctx: &AppContext,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let name = display_name(user);
    log_command_start("/verify", &name, user.id.0, msg.chat.id.0, None);

    if !msg.chat.is_private() {
        bot.send_message(msg.chat.id, "请在与机器人的私聊中使用 /verify 命令完成手机验证。")
            .await?;
        return Ok(());
    }

    match PhoneVerification::find_by_user(&ctx.db.pool, user.id.0 as i64).await {
        Ok(Some(record)) if record.is_verified => {
            bot.send_message(msg.chat.id, already_verified_text(&record)).await?;
            dialogue.exit().await?;
            return Ok(());
        }
        Ok(_) => {}
        Err(e) => {
            log_database_error("SELECT", "phone_verifications", &e.to_string(), Some("/verify"));
            CommandFeedback::new(bot, msg.chat.id)
                .error("读取验证记录失败，请稍后再试。")
                .await?;
            return Ok(());
        }
    }

    bot.send_message(msg.chat.id, PHONE_PROMPT)
        .parse_mode(ParseMode::Html)
        .await?;
    dialogue.update(VerifyState::AwaitingPhone).await?;
    Ok(())
}

pub async fn receive_phone(
    bot: Bot,
    msg: Message,
    dialogue: VerifyDialogue,
    ctx: &AppContext,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let name = display_name(user);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(text) = msg.text() else {
        feedback
            .validation_error("请以文字形式发送手机号码。", CANCEL_HINT)
            .await?;
        return Ok(());
    };

    let phone = match validate_phone_number(text) {
        Ok(phone) => phone,
        Err(e) => {
            log_validation_error("/verify", "phone", text, &e.to_string(), &name, user.id.0, msg.chat.id.0);
            feedback
                .validation_error(
                    "手机号格式不正确。",
                    &format!("请按 +国家代码电话号码 的格式重新输入，例如：+8613812345678\n\n{CANCEL_HINT}"),
                )
                .await?;
            return Ok(());
        }
    };

    let outcome = ctx
        .registry
        .issue(user.id.0, &phone, ctx.code_length, ctx.ttl_minutes)
        .await;

    match &outcome {
        Ok(issued) => {
            log_command_success("/verify", &name, user.id.0, msg.chat.id.0, Some("code sent"));
            feedback
                .success(&format!(
                    "验证码已发送到您的手机，请查收。\n\n请在{}分钟内输入收到的{}位数字验证码。\n\n{CANCEL_HINT}",
                    ctx.ttl_minutes,
                    issued.code.len()
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("/verify", &name, user.id.0, msg.chat.id.0, &e.to_string());
            feedback
                .error(&format!(
                    "发送验证码失败: {}\n\n请检查手机号是否正确，然后重试。\n\n{CANCEL_HINT}",
                    e.user_message()
                ))
                .await?;
        }
    }
    transition(&dialogue, Some(state_after_issue(&outcome))).await
}

pub async fn receive_code(
    bot: Bot,
    msg: Message,
    dialogue: VerifyDialogue,
    phone: String,
    ctx: &AppContext,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let name = display_name(user);
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let code = match msg.text().map(|t| validate_verification_code(t, ctx.code_length)) {
        Some(Ok(code)) => code,
        other => {
            if let Some(Err(e)) = other {
                log_validation_error("/verify", "code", msg.text().unwrap_or_default(), &e.to_string(), &name, user.id.0, msg.chat.id.0);
            }
            feedback
                .validation_error(
                    "验证码格式不正确。",
                    &format!("请输入{}位数字验证码。\n\n{CANCEL_HINT}", ctx.code_length),
                )
                .await?;
            return Ok(());
        }
    };

    let outcome = ctx.registry.verify(user.id.0, &code);
    let next = state_after_code(&outcome, &phone);

    match outcome {
        Ok(verified_phone) => {
            transition(&dialogue, next).await?;
            match PhoneVerification::mark_verified(
                &ctx.db.pool,
                user.id.0 as i64,
                user.username.clone(),
                &verified_phone,
            )
            .await
            {
                Ok(_) => {
                    log_command_success("/verify", &name, user.id.0, msg.chat.id.0, Some("phone verified"));
                    bot.send_message(
                        msg.chat.id,
                        "🎉 <b>验证成功</b> 🎉\n\n您的手机号已成功验证！现在您可以使用所有机器人功能。\n\n感谢您的配合，祝您使用愉快！",
                    )
                    .parse_mode(ParseMode::Html)
                    .await?;
                }
                Err(e) => {
                    log_database_error("UPSERT", "phone_verifications", &e.to_string(), Some(&phone));
                    feedback
                        .warning("验证成功，但保存信息时出现问题。请联系管理员。")
                        .await?;
                }
            }
            Ok(())
        }
        Err(VerificationError::Mismatch) => {
            feedback
                .error(&format!(
                    "{}\n\n请重新输入验证码，或输入 /cancel 取消验证流程。",
                    VerificationError::Mismatch.user_message()
                ))
                .await?;
            transition(&dialogue, next).await
        }
        Err(e) => {
            log_command_error("/verify", &name, user.id.0, msg.chat.id.0, &e.to_string());
            feedback
                .error(&format_validation_error(
                    &e.user_message(),
                    &format!("请重新发送手机号码以获取新的验证码。\n\n{CANCEL_HINT}"),
                ))
                .await?;
            transition(&dialogue, next).await
        }
    }
}

pub async fn cancel(bot: Bot, msg: Message, dialogue: VerifyDialogue) -> HandlerResult {
    dialogue.exit().await?;
    CommandFeedback::new(bot, msg.chat.id).error("验证已取消。").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sms::SmsError;

    #[test]
    fn test_format_verification_date() {
        assert_eq!(
            format_verification_date(Some("2024-03-01T08:30:00+00:00")),
            "2024-03-01 08:30:00"
        );
        assert_eq!(format_verification_date(Some("yesterday")), "未知");
        assert_eq!(format_verification_date(None), "未知");
    }

    fn issued(phone: &str) -> IssuedCode {
        IssuedCode {
            code: "123456".to_string(),
            expires_at: chrono::Utc::now(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_delivered_code_moves_to_code_entry() {
        assert_eq!(
            state_after_issue(&Ok(issued("+8613812345678"))),
            VerifyState::AwaitingCode {
                phone: "+8613812345678".to_string()
            }
        );
    }

    #[test]
    fn test_failed_delivery_keeps_asking_for_phone() {
        for err in [
            VerificationError::DeliveryFailed(SmsError::InvalidNumber),
            VerificationError::DeliveryFailed(SmsError::Transport("timeout".to_string())),
            VerificationError::InvalidTtl(i64::MAX),
        ] {
            assert_eq!(state_after_issue(&Err(err)), VerifyState::AwaitingPhone);
        }
    }

    #[test]
    fn test_correct_code_ends_dialogue() {
        assert_eq!(state_after_code(&Ok("+8613812345678".to_string()), "+8613812345678"), None);
    }

    #[test]
    fn test_wrong_code_stays_in_code_entry() {
        assert_eq!(
            state_after_code(&Err(VerificationError::Mismatch), "+8613812345678"),
            Some(VerifyState::AwaitingCode {
                phone: "+8613812345678".to_string()
            })
        );
    }

    #[test]
    fn test_expired_or_missing_code_asks_for_phone_again() {
        assert_eq!(
            state_after_code(&Err(VerificationError::Expired), "+8613812345678"),
            Some(VerifyState::AwaitingPhone)
        );
        assert_eq!(
            state_after_code(&Err(VerificationError::NotFound), "+8613812345678"),
            Some(VerifyState::AwaitingPhone)
        );
    }
}
