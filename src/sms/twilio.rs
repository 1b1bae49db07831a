use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use super::{SmsError, SmsReceipt, SmsSender};
use crate::config::TwilioConfig;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Sends SMS through the Twilio Messages REST API.
///
/// Built without credentials it answers every send with
/// [`SmsError::NotConfigured`] and never touches the network.
pub struct TwilioSender {
    client: reqwest::Client,
    config: Option<TwilioConfig>,
    api_base: String,
}

impl TwilioSender {
    pub fn new(config: Option<TwilioConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_base: TWILIO_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Maps a Twilio error code to the error kinds callers care about.
pub fn classify_error(code: Option<i64>, message: String) -> SmsError {
    match code {
        Some(21211) => SmsError::InvalidNumber,
        Some(21608) => SmsError::NotMobile,
        Some(21610) => SmsError::OptedOut,
        _ => SmsError::Provider { code, message },
    }
}

#[async_trait]
impl SmsSender for TwilioSender {
    async fn send(&self, phone_number: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        let Some(config) = &self.config else {
            error!("Twilio credentials are incomplete, cannot send SMS");
            return Err(SmsError::NotConfigured);
        };

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base, config.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[
                ("To", phone_number),
                ("From", config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        if response.status().is_success() {
            let resource: MessageResource = response
                .json()
                .await
                .map_err(|e| SmsError::Transport(e.to_string()))?;
            info!("SMS accepted: sid={}, status={}", resource.sid, resource.status);
            return Ok(SmsReceipt {
                sid: resource.sid,
                status: resource.status,
            });
        }

        let status = response.status();
        let body: TwilioErrorBody = response.json().await.unwrap_or(TwilioErrorBody {
            code: None,
            message: None,
        });
        let message = body
            .message
            .unwrap_or_else(|| format!("HTTP {status}"));
        error!("Twilio rejected SMS to {}: {:?} {}", phone_number, body.code, message);

        Err(classify_error(body.code, message))
    }
}
