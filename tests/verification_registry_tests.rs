use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use group_admin_bot::sms::{SmsError, SmsReceipt, SmsSender};
use group_admin_bot::verification::{
    Clock, ManualClock, VerificationError, VerificationRegistry,
};
use std::sync::{Arc, Mutex};

/// Records every message and optionally fails with a fixed error.
#[derive(Default)]
struct FakeSms {
    sent: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<SmsError>>,
}

impl FakeSms {
    fn failing(error: SmsError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(Some(error)),
        }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send(&self, phone: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.sent.lock().unwrap().push((phone.to_string(), body.to_string()));
        Ok(SmsReceipt {
            sid: format!("SM{}", self.sent.lock().unwrap().len()),
            status: "queued".to_string(),
        })
    }
}

fn setup(sms: FakeSms) -> (VerificationRegistry, Arc<FakeSms>, ManualClock) {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    let sms = Arc::new(sms);
    let registry = VerificationRegistry::new(sms.clone(), Arc::new(clock.clone()));
    (registry, sms, clock)
}

const PHONE: &str = "+8613800000000";

#[tokio::test]
async fn test_issue_then_verify_succeeds_exactly_once() {
    let (registry, sms, clock) = setup(FakeSms::default());
    let issued_at = clock.now();

    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();
    assert_eq!(issued.code.len(), 6);
    assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(issued.expires_at, issued_at + Duration::minutes(10));
    assert_eq!(issued.phone, PHONE);

    let sent = sms.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, PHONE);
    assert_eq!(
        sent[0].1,
        format!("【好旺公群】您的验证码是 {}，10分钟内有效。请勿泄露给他人！", issued.code)
    );

    clock.advance(Duration::minutes(5));
    assert_eq!(registry.verify(42, &issued.code), Ok(PHONE.to_string()));
    assert_eq!(registry.verify(42, &issued.code), Err(VerificationError::NotFound));
    assert_eq!(registry.pending_count(), 0);
}

#[tokio::test]
async fn test_code_is_valid_through_its_expiry_instant() {
    let (registry, _sms, clock) = setup(FakeSms::default());
    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();

    clock.set(issued.expires_at);
    assert_eq!(registry.verify(42, &issued.code), Ok(PHONE.to_string()));
}

#[tokio::test]
async fn test_expired_code_is_purged_on_verify() {
    let (registry, _sms, clock) = setup(FakeSms::default());
    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();

    clock.set(issued.expires_at + Duration::seconds(1));
    assert_eq!(registry.verify(42, &issued.code), Err(VerificationError::Expired));
    assert_eq!(registry.verify(42, &issued.code), Err(VerificationError::NotFound));
    assert!(registry.pending(42).is_none());
}

#[tokio::test]
async fn test_wrong_code_keeps_record() {
    let (registry, _sms, _clock) = setup(FakeSms::default());
    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();

    let wrong = if issued.code == "000000" { "111111" } else { "000000" };
    assert_eq!(registry.verify(42, wrong), Err(VerificationError::Mismatch));
    assert_eq!(registry.verify(42, wrong), Err(VerificationError::Mismatch));
    assert_eq!(registry.pending_count(), 1);

    assert_eq!(registry.verify(42, &issued.code), Ok(PHONE.to_string()));
}

#[tokio::test]
async fn test_verify_without_issue_is_not_found() {
    let (registry, _sms, _clock) = setup(FakeSms::default());
    assert_eq!(registry.verify(7, "123456"), Err(VerificationError::NotFound));
}

#[tokio::test]
async fn test_reissue_replaces_pending_code() {
    let (registry, sms, _clock) = setup(FakeSms::default());
    let first = registry.issue(42, PHONE, 6, 10).await.unwrap();

    // draw again until the codes differ so the old one is a genuine mismatch
    let mut second = registry.issue(42, "+85261234567", 6, 10).await.unwrap();
    while second.code == first.code {
        second = registry.issue(42, "+85261234567", 6, 10).await.unwrap();
    }

    assert_eq!(registry.pending_count(), 1);
    assert!(sms.sent().len() >= 2);
    assert_eq!(registry.verify(42, &first.code), Err(VerificationError::Mismatch));
    assert_eq!(registry.verify(42, &second.code), Ok("+85261234567".to_string()));
}

#[tokio::test]
async fn test_failed_delivery_stores_nothing() {
    let (registry, sms, _clock) = setup(FakeSms::failing(SmsError::NotMobile));

    let err = registry.issue(42, PHONE, 6, 10).await.unwrap_err();
    assert_eq!(err, VerificationError::DeliveryFailed(SmsError::NotMobile));
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "该号码不是有效的手机号码");

    assert!(sms.sent().is_empty());
    assert_eq!(registry.pending_count(), 0);
    assert_eq!(registry.verify(42, "123456"), Err(VerificationError::NotFound));
}

#[tokio::test]
async fn test_failed_reissue_keeps_previous_code() {
    let (registry, sms, _clock) = setup(FakeSms::default());
    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();

    *sms.failure.lock().unwrap() = Some(SmsError::Transport("timeout".to_string()));
    let err = registry.issue(42, PHONE, 6, 10).await.unwrap_err();
    assert!(err.is_retryable());

    assert_eq!(registry.verify(42, &issued.code), Ok(PHONE.to_string()));
}

#[tokio::test]
async fn test_sweep_removes_only_expired_records() {
    let (registry, _sms, clock) = setup(FakeSms::default());
    let start = clock.now();

    registry.issue(1, PHONE, 6, 5).await.unwrap();
    registry.issue(2, PHONE, 6, 10).await.unwrap();
    registry.issue(3, PHONE, 6, 30).await.unwrap();

    // a record expiring exactly at `now` is not yet stale
    assert_eq!(registry.sweep_expired(start + Duration::minutes(5)), 0);

    let later = start + Duration::minutes(11);
    assert_eq!(registry.sweep_expired(later), 2);
    assert_eq!(registry.sweep_expired(later), 0);

    assert!(registry.pending(1).is_none());
    assert!(registry.pending(2).is_none());
    assert!(registry.pending(3).is_some());
}

#[tokio::test]
async fn test_concurrent_verify_succeeds_once() {
    let (registry, _sms, _clock) = setup(FakeSms::default());
    let registry = Arc::new(registry);
    let issued = registry.issue(42, PHONE, 6, 10).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let code = issued.code.clone();
            tokio::spawn(async move { registry.verify(42, &code) })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(phone) => {
                assert_eq!(phone, PHONE);
                successes += 1;
            }
            Err(e) => assert_eq!(e, VerificationError::NotFound),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_code_length_is_respected() {
    let (registry, _sms, _clock) = setup(FakeSms::default());
    let issued = registry.issue(42, PHONE, 8, 10).await.unwrap();
    assert_eq!(issued.code.len(), 8);
}

#[tokio::test]
async fn test_unrepresentable_ttl_is_rejected_before_sending() {
    let (registry, sms, _clock) = setup(FakeSms::default());

    let err = registry.issue(42, PHONE, 6, i64::MAX).await.unwrap_err();
    assert_eq!(err, VerificationError::InvalidTtl(i64::MAX));
    assert!(!err.is_retryable());

    assert!(sms.sent().is_empty());
    assert_eq!(registry.pending_count(), 0);
}
