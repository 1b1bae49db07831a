pub mod moderation;
pub mod start;
pub mod stats;
pub mod verify;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "可用命令：")]
pub enum Command {
    #[command(description = "查看帮助信息")]
    Help,
    #[command(description = "启动机器人并获取欢迎信息")]
    Start,
    #[command(description = "通过手机号验证您的身份")]
    Verify,
    #[command(description = "取消当前的验证流程")]
    Cancel,
    #[command(description = "封禁指定用户（仅限管理员），例如：/ban 123456789")]
    Ban(String),
    #[command(description = "禁言用户一段时间（仅限管理员），例如：/mute 123456789 30m")]
    Mute(String),
    #[command(description = "解除用户的禁言（仅限管理员）")]
    Unmute(String),
    #[command(description = "显示群组统计信息（仅限管理员）")]
    Stats,
    #[command(description = "打开管理员命令面板（仅限管理员）")]
    Admin,
}

const HELP_FOOTER: &str = "时长单位：m(分钟)、h(小时)、d(天)\n\
例如：30m, 2h, 1d\n\n\
注意：本机器人只响应群组管理员的命令和关键词。\n\
但任何用户都可以通过\"验群\"关键词验证群组真实性。\n\
某些功能可能需要先完成手机验证，请使用 /verify 命令进行验证。";

/// Full `/help` text, also shown by the private-chat help button.
pub fn help_text() -> String {
    format!("{}\n\n{}", Command::descriptions(), HELP_FOOTER)
}
