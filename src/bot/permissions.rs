use teloxide::prelude::*;

/// Owners and administrators count as admins. Lookup failures count as not admin.
pub async fn is_user_admin(bot: &Bot, chat_id: ChatId, user_id: UserId) -> bool {
    match bot.get_chat_member(chat_id, user_id).await {
        Ok(member) => member.is_privileged(),
        Err(e) => {
            tracing::warn!(
                "Failed to check admin status of user {} in chat {}: {}",
                user_id.0,
                chat_id.0,
                e
            );
            false
        }
    }
}
