//! Outbound SMS delivery.

pub mod twilio;

use async_trait::async_trait;

pub use twilio::TwilioSender;

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsReceipt {
    pub sid: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    /// Provider credentials are missing.
    NotConfigured,
    /// The number is malformed (Twilio 21211).
    InvalidNumber,
    /// The number is not a mobile number (Twilio 21608).
    NotMobile,
    /// The recipient opted out of SMS (Twilio 21610).
    OptedOut,
    /// Any other provider-side rejection.
    Provider { code: Option<i64>, message: String },
    /// Network or decoding failure before a provider answer was read.
    Transport(String),
}

impl SmsError {
    /// Failures that will not go away without the user entering another number.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SmsError::InvalidNumber | SmsError::NotMobile | SmsError::OptedOut
        )
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SmsError::NotConfigured => "短信服务配置不完整，请联系管理员",
            SmsError::InvalidNumber => "无效的电话号码格式，请确保包含国家代码 (例如: +8613800138000)",
            SmsError::NotMobile => "该号码不是有效的手机号码",
            SmsError::OptedOut => "该号码已选择不接收短信",
            SmsError::Provider { .. } => "短信发送失败",
            SmsError::Transport(_) => "发送短信时出现未知错误",
        }
    }
}

impl std::fmt::Display for SmsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmsError::NotConfigured => write!(f, "SMS provider is not configured"),
            SmsError::InvalidNumber => write!(f, "invalid phone number"),
            SmsError::NotMobile => write!(f, "phone number is not a mobile number"),
            SmsError::OptedOut => write!(f, "recipient opted out of SMS"),
            SmsError::Provider { code: Some(code), message } => {
                write!(f, "provider error {code}: {message}")
            }
            SmsError::Provider { code: None, message } => write!(f, "provider error: {message}"),
            SmsError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for SmsError {}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone_number: &str, body: &str) -> Result<SmsReceipt, SmsError>;
}
