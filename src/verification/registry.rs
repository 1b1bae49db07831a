use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

use super::clock::Clock;
use crate::sms::{SmsError, SmsSender};

pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_TTL_MINUTES: i64 = 10;
/// One day.
pub const MAX_TTL_MINUTES: i64 = 24 * 60;

/// A pending verification for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    pub user_id: u64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub phone: String,
}

/// Returned by [`VerificationRegistry::issue`] once the SMS went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No pending code for this user (never issued, already used or purged).
    NotFound,
    /// The code existed but its TTL elapsed. The record is gone now.
    Expired,
    /// The submitted code differs from the stored one.
    Mismatch,
    /// The SMS provider refused or failed the delivery.
    DeliveryFailed(SmsError),
    /// The requested lifetime cannot be added to the current time.
    InvalidTtl(i64),
}

impl VerificationError {
    /// Whether the user can recover by re-issuing or resubmitting without
    /// changing the phone number.
    pub fn is_retryable(&self) -> bool {
        match self {
            VerificationError::DeliveryFailed(err) => !err.is_permanent(),
            VerificationError::InvalidTtl(_) => false,
            _ => true,
        }
    }

    /// Text shown to the user in chat.
    pub fn user_message(&self) -> String {
        match self {
            VerificationError::NotFound => "验证码不存在或已过期，请重新获取验证码".to_string(),
            VerificationError::Expired => "验证码已过期，请重新获取验证码".to_string(),
            VerificationError::Mismatch => "验证码错误，请重新输入".to_string(),
            VerificationError::DeliveryFailed(err) => err.user_message().to_string(),
            VerificationError::InvalidTtl(_) => "验证服务配置错误，请联系管理员".to_string(),
        }
    }
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::NotFound => write!(f, "no pending verification"),
            VerificationError::Expired => write!(f, "verification code expired"),
            VerificationError::Mismatch => write!(f, "verification code mismatch"),
            VerificationError::DeliveryFailed(err) => write!(f, "code delivery failed: {err}"),
            VerificationError::InvalidTtl(ttl) => write!(f, "invalid code lifetime: {ttl} minutes"),
        }
    }
}

impl std::error::Error for VerificationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerificationError::DeliveryFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Draws `length` independent, uniformly distributed decimal digits.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// One-time phone verification codes keyed by Telegram user id.
///
/// A user is either absent or has exactly one pending record. Issuing again
/// replaces the record, a successful or expired `verify` removes it. Nothing
/// here runs on a timer: callers drive [`sweep_expired`](Self::sweep_expired).
pub struct VerificationRegistry {
    records: Mutex<HashMap<u64, VerificationRecord>>,
    sms: Arc<dyn SmsSender>,
    clock: Arc<dyn Clock>,
}

impl VerificationRegistry {
    pub fn new(sms: Arc<dyn SmsSender>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            sms,
            clock,
        }
    }

    fn records(&self) -> MutexGuard<'_, HashMap<u64, VerificationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Generates a code, sends it and, only if the SMS was accepted, stores it.
    pub async fn issue(
        &self,
        user_id: u64,
        phone_number: &str,
        code_length: usize,
        ttl_minutes: i64,
    ) -> Result<IssuedCode, VerificationError> {
        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .ok_or(VerificationError::InvalidTtl(ttl_minutes))?;
        let code = generate_code(code_length);
        let body = format!("【好旺公群】您的验证码是 {code}，{ttl_minutes}分钟内有效。请勿泄露给他人！");

        // The lock is not held across the provider call.
        if let Err(e) = self.sms.send(phone_number, &body).await {
            error!("Verification code delivery to {} failed: {}", phone_number, e);
            return Err(VerificationError::DeliveryFailed(e));
        }

        self.records().insert(
            user_id,
            VerificationRecord {
                user_id,
                code: code.clone(),
                expires_at,
                phone: phone_number.to_string(),
            },
        );
        info!("Verification code sent to {}, expires at {}", phone_number, expires_at);

        Ok(IssuedCode {
            code,
            expires_at,
            phone: phone_number.to_string(),
        })
    }

    /// Checks a submitted code and returns the verified phone number.
    ///
    /// Expiry check, comparison and removal happen under one lock so a code
    /// can only ever succeed once.
    pub fn verify(&self, user_id: u64, submitted_code: &str) -> Result<String, VerificationError> {
        let now = self.clock.now();
        let mut records = self.records();

        let (expired, matches) = match records.get(&user_id) {
            Some(record) => (now > record.expires_at, record.code == submitted_code),
            None => return Err(VerificationError::NotFound),
        };

        if expired {
            records.remove(&user_id);
            return Err(VerificationError::Expired);
        }

        if !matches {
            return Err(VerificationError::Mismatch);
        }

        let record = records.remove(&user_id).ok_or(VerificationError::NotFound)?;
        Ok(record.phone)
    }

    /// Drops every record with `expires_at < now`.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        let removed = before - records.len();

        if removed > 0 {
            info!("Swept {} expired verification codes", removed);
        }
        removed
    }

    pub fn pending_count(&self) -> usize {
        self.records().len()
    }

    pub fn pending(&self, user_id: u64) -> Option<VerificationRecord> {
        self.records().get(&user_id).cloned()
    }
}
