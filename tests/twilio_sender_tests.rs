use axum::{extract::Path, http::StatusCode, routing::post, Form, Json, Router};
use group_admin_bot::config::TwilioConfig;
use group_admin_bot::sms::{SmsError, SmsSender, TwilioSender};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Stand-in for the Messages endpoint: numbers ending in 0 are rejected as
/// invalid, numbers ending in 9 get an error without a body.
async fn messages(
    Path(sid): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let to = form.get("To").cloned().unwrap_or_default();
    if to.ends_with('0') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 21211, "message": "The 'To' number is not a valid phone number." })),
        );
    }
    if to.ends_with('9') {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Null));
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "sid": format!("SM-{sid}-{}", form.get("Body").map(|b| b.len()).unwrap_or(0)),
            "status": "queued",
            "from": form.get("From"),
        })),
    )
}

async fn start_stub() -> String {
    let app = Router::new().route("/Accounts/:sid/Messages.json", post(messages));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{addr}")
}

fn sender(api_base: String) -> TwilioSender {
    TwilioSender::new(Some(TwilioConfig {
        account_sid: "AC123".to_string(),
        auth_token: "secret".to_string(),
        from_number: "+15005550006".to_string(),
    }))
    .with_api_base(api_base)
}

#[tokio::test]
async fn test_accepted_message_returns_receipt() {
    let sender = sender(start_stub().await);

    let receipt = sender.send("+8613812345678", "hello").await.expect("send should succeed");
    assert_eq!(receipt.sid, "SM-AC123-5");
    assert_eq!(receipt.status, "queued");
}

#[tokio::test]
async fn test_provider_error_code_is_classified() {
    let sender = sender(start_stub().await);

    let err = sender.send("+8613812345670", "hello").await.unwrap_err();
    assert_eq!(err, SmsError::InvalidNumber);
    assert!(err.is_permanent());
}

#[tokio::test]
async fn test_error_without_body_keeps_http_status() {
    let sender = sender(start_stub().await);

    let err = sender.send("+8613812345679", "hello").await.unwrap_err();
    match err {
        SmsError::Provider { code, message } => {
            assert_eq!(code, None);
            assert!(message.contains("500"), "unexpected message {message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // bind and drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let sender = sender(format!("http://{addr}"));
    let err = sender.send("+8613812345678", "hello").await.unwrap_err();
    assert!(matches!(err, SmsError::Transport(_)));
    assert!(!err.is_permanent());
}
