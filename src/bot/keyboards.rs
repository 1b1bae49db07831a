//! Inline keyboards and the callback data they carry.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Preset mute lengths offered by the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutePreset {
    ThirtyMinutes,
    OneHour,
    SixHours,
    OneDay,
    Custom,
}

impl MutePreset {
    fn code(&self) -> &'static str {
        match self {
            MutePreset::ThirtyMinutes => "30m",
            MutePreset::OneHour => "1h",
            MutePreset::SixHours => "6h",
            MutePreset::OneDay => "1d",
            MutePreset::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MutePreset::ThirtyMinutes => "30分钟",
            MutePreset::OneHour => "1小时",
            MutePreset::SixHours => "6小时",
            MutePreset::OneDay => "1天",
            MutePreset::Custom => "自定义时长",
        }
    }

    /// Argument for `/mute`, `None` for the custom preset.
    pub fn command_arg(&self) -> Option<&'static str> {
        match self {
            MutePreset::Custom => None,
            other => Some(other.code()),
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "30m" => Some(MutePreset::ThirtyMinutes),
            "1h" => Some(MutePreset::OneHour),
            "6h" => Some(MutePreset::SixHours),
            "1d" => Some(MutePreset::OneDay),
            "custom" => Some(MutePreset::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    AdminStats,
    AdminBan,
    AdminWarn,
    AdminMute,
    AdminRules,
    AdminClean,
    AdminHelp,
    AdminBack,
    Mute(MutePreset),
    Unmute,
    VerifyPhone,
    SearchGroup,
    ViewChannels,
    HelpInfo,
    MainMenu,
}

impl CallbackAction {
    pub fn data(&self) -> String {
        match self {
            CallbackAction::AdminStats => "admin_stats".to_string(),
            CallbackAction::AdminBan => "admin_ban".to_string(),
            CallbackAction::AdminWarn => "admin_warn".to_string(),
            CallbackAction::AdminMute => "admin_mute".to_string(),
            CallbackAction::AdminRules => "admin_rules".to_string(),
            CallbackAction::AdminClean => "admin_clean".to_string(),
            CallbackAction::AdminHelp => "admin_help".to_string(),
            CallbackAction::AdminBack => "admin_back".to_string(),
            CallbackAction::Mute(preset) => format!("mute_{}", preset.code()),
            CallbackAction::Unmute => "unmute_user".to_string(),
            CallbackAction::VerifyPhone => "verify_phone".to_string(),
            CallbackAction::SearchGroup => "search_group".to_string(),
            CallbackAction::ViewChannels => "view_channels".to_string(),
            CallbackAction::HelpInfo => "help_info".to_string(),
            CallbackAction::MainMenu => "main_menu".to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        if let Some(code) = data.strip_prefix("mute_") {
            return MutePreset::from_code(code).map(CallbackAction::Mute);
        }
        let action = match data {
            "admin_stats" => CallbackAction::AdminStats,
            "admin_ban" => CallbackAction::AdminBan,
            "admin_warn" => CallbackAction::AdminWarn,
            "admin_mute" => CallbackAction::AdminMute,
            "admin_rules" => CallbackAction::AdminRules,
            "admin_clean" => CallbackAction::AdminClean,
            "admin_help" => CallbackAction::AdminHelp,
            "admin_back" => CallbackAction::AdminBack,
            "unmute_user" => CallbackAction::Unmute,
            "verify_phone" => CallbackAction::VerifyPhone,
            "search_group" => CallbackAction::SearchGroup,
            "view_channels" => CallbackAction::ViewChannels,
            "help_info" => CallbackAction::HelpInfo,
            // older keyboards used this name for the main menu
            "main_menu" | "back_to_main" => CallbackAction::MainMenu,
            _ => return None,
        };
        Some(action)
    }

    /// Admin panel actions re-check the caller's rights before running.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            CallbackAction::AdminStats
                | CallbackAction::AdminBan
                | CallbackAction::AdminWarn
                | CallbackAction::AdminMute
                | CallbackAction::AdminRules
                | CallbackAction::AdminClean
                | CallbackAction::AdminHelp
                | CallbackAction::AdminBack
                | CallbackAction::Mute(_)
                | CallbackAction::Unmute
        )
    }
}

fn button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.data())
}

/// Link button; `None` if the link is not a valid URL.
pub fn url_button(text: &str, link: &str) -> Option<InlineKeyboardButton> {
    reqwest::Url::parse(link)
        .ok()
        .map(|url| InlineKeyboardButton::url(text, url))
}

pub const ADMIN_PANEL_TEXT: &str = "📋 <b>管理员命令面板</b> 📋\n\n请选择要执行的操作：";

pub fn admin_panel() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("📊 群组统计", CallbackAction::AdminStats),
            button("🚫 封禁用户", CallbackAction::AdminBan),
        ],
        vec![
            button("⚠️ 警告用户", CallbackAction::AdminWarn),
            button("🔇 禁言用户", CallbackAction::AdminMute),
        ],
        vec![
            button("📝 群组规则", CallbackAction::AdminRules),
            button("🔨 清理消息", CallbackAction::AdminClean),
        ],
        vec![button("❓ 管理帮助", CallbackAction::AdminHelp)],
    ])
}

pub fn mute_menu() -> InlineKeyboardMarkup {
    let preset = |p: MutePreset| button(&format!("🔇 {}", p.label()), CallbackAction::Mute(p));
    InlineKeyboardMarkup::new(vec![
        vec![preset(MutePreset::ThirtyMinutes), preset(MutePreset::OneHour)],
        vec![preset(MutePreset::SixHours), preset(MutePreset::OneDay)],
        vec![
            preset(MutePreset::Custom),
            button("🔊 解除禁言", CallbackAction::Unmute),
        ],
        vec![button("🔙 返回", CallbackAction::AdminBack)],
    ])
}

pub fn back_to_admin() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🔙 返回", CallbackAction::AdminBack)]])
}

pub fn back_to_mute_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🔙 返回禁言菜单", CallbackAction::AdminMute)]])
}

pub fn back_to_main() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🔙 返回主菜单", CallbackAction::MainMenu)]])
}

/// Private-chat main menu; the verify button only shows for unverified users.
pub fn main_menu(is_verified: bool) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if !is_verified {
        rows.push(vec![button("📱 立即验证手机号", CallbackAction::VerifyPhone)]);
    }
    rows.push(vec![button("🔍 搜索群组", CallbackAction::SearchGroup)]);
    rows.push(vec![button("ℹ️ 查看频道", CallbackAction::ViewChannels)]);
    rows.push(vec![button("❓ 帮助信息", CallbackAction::HelpInfo)]);
    InlineKeyboardMarkup::new(rows)
}

/// One button per channel, then back to the main menu.
pub fn channels_menu<'a>(
    channels: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = channels
        .into_iter()
        .filter_map(|(name, link)| url_button(name, link))
        .map(|b| vec![b])
        .collect();
    rows.push(vec![button("🔙 返回主菜单", CallbackAction::MainMenu)]);
    InlineKeyboardMarkup::new(rows)
}

pub const SUPPORT_LINK: &str = "https://t.me/kefu";

/// Shown when a directory lookup finds nothing.
pub fn not_found_menu() -> InlineKeyboardMarkup {
    let mut rows = vec![vec![button("返回主菜单", CallbackAction::MainMenu)]];
    if let Some(support) = url_button("联系客服", SUPPORT_LINK) {
        rows.push(vec![support]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// One join button per `(name, link)`, then the main menu. Invalid links are skipped.
pub fn search_results_menu<'a>(
    groups: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = groups
        .into_iter()
        .filter_map(|(name, link)| url_button(&format!("加入 {name}"), link))
        .map(|join| vec![join])
        .collect();
    rows.push(vec![button("返回主菜单", CallbackAction::MainMenu)]);
    InlineKeyboardMarkup::new(rows)
}
