pub mod callback;
pub mod group_message;
pub mod message;
pub mod private_chat;

use teloxide::{
    dispatching::{dialogue, UpdateHandler},
    prelude::*,
    types::{Me, User},
};

use crate::bot::commands::{verify, Command};
use crate::bot::context::AppContext;
use crate::bot::state::{HandlerResult, VerifyDialogue, VerifyState, VerifyStorage};

pub struct BotHandler {
    pub ctx: AppContext,
}

impl BotHandler {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Commands first, then the `/verify` dialogue, then plain messages and buttons.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use dptree::case;
        use teloxide::dispatching::UpdateFilterExt;

        let command_ctx = self.ctx.clone();
        let phone_ctx = self.ctx.clone();
        let code_ctx = self.ctx.clone();
        let text_ctx = self.ctx.clone();
        let callback_ctx = self.ctx.clone();

        let commands = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(move |bot: Bot, msg: Message, cmd: Command, dialogue: VerifyDialogue| {
                let ctx = command_ctx.clone();
                async move { message::command_handler(bot, msg, cmd, dialogue, ctx).await }
            });

        let verification = Update::filter_message()
            .branch(case![VerifyState::AwaitingPhone].endpoint(
                move |bot: Bot, msg: Message, dialogue: VerifyDialogue| {
                    let ctx = phone_ctx.clone();
                    async move { verify::receive_phone(bot, msg, dialogue, &ctx).await }
                },
            ))
            .branch(case![VerifyState::AwaitingCode { phone }].endpoint(
                move |bot: Bot, msg: Message, dialogue: VerifyDialogue, phone: String| {
                    let ctx = code_ctx.clone();
                    async move { verify::receive_code(bot, msg, dialogue, phone, &ctx).await }
                },
            ));

        let new_members = Update::filter_message()
            .filter_map(|msg: Message| msg.new_chat_members().map(|members| members.to_vec()))
            .endpoint(|bot: Bot, msg: Message, members: Vec<User>, me: Me| async move {
                group_message::welcome_new_members(bot, msg, members, me).await
            });

        let text = Update::filter_message()
            .filter(|msg: Message| msg.text().is_some())
            .endpoint(move |bot: Bot, msg: Message| {
                let ctx = text_ctx.clone();
                async move { text_handler(bot, msg, ctx).await }
            });

        let callbacks = Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
            let ctx = callback_ctx.clone();
            async move { callback::callback_handler(bot, q, ctx).await }
        });

        dialogue::enter::<Update, VerifyStorage, VerifyState, _>()
            .branch(commands)
            .branch(verification)
            .branch(new_members)
            .branch(text)
            .branch(callbacks)
    }
}

async fn text_handler(bot: Bot, msg: Message, ctx: AppContext) -> HandlerResult {
    ctx.status.record_message();

    if msg.chat.is_private() {
        private_chat::handle_private_text(bot, msg, ctx).await
    } else if msg.chat.is_group() || msg.chat.is_supergroup() {
        group_message::auto_reply(bot, msg, ctx).await
    } else {
        Ok(())
    }
}
