/// Integration tests for the lead endpoint with a mocked Telegram Bot API
/// Drives the full router without hitting the real Telegram service
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use lead_relay::config::Config;
use lead_relay::errors::{
    INTERNAL_ERROR_MESSAGE, MALFORMED_BODY_MESSAGE, MISSING_FIELDS_MESSAGE, RELAY_FAILED_MESSAGE,
};
use lead_relay::handlers::AppState;
use lead_relay::routes::build_router;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:TEST_TOKEN";
const CHAT_ID: &str = "-1001234567890";
const SEND_MESSAGE_PATH: &str = "/bot123456:TEST_TOKEN/sendMessage";

/// Helper function to create test config
fn create_test_config(telegram_api_url: String) -> Config {
    Config {
        port: 3000,
        telegram_bot_token: TOKEN.to_string(),
        telegram_chat_id: CHAT_ID.to_string(),
        telegram_api_url,
        telegram_timeout_secs: Some(5),
        static_dir: PathBuf::from("."),
        rate_limit: None,
    }
}

fn create_app(telegram_api_url: String) -> Router {
    let state = AppState::new(create_test_config(telegram_api_url)).unwrap();
    build_router(Arc::new(state)).unwrap()
}

fn lead_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/send-lead")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn full_lead() -> Value {
    json!({
        "name": "Ann",
        "phone": "+7 999 123-45-67",
        "email": "ann@example.com",
        "company": "Acme",
        "message": "Need a sales bot"
    })
}

#[tokio::test]
async fn test_lead_relayed_on_acknowledgement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({
            "chat_id": CHAT_ID,
            "parse_mode": "HTML"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(create_app(mock_server.uri()), lead_request(&full_lead())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Заявка отправлена"}));
}

#[tokio::test]
async fn test_outbound_text_is_templated_and_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lead = json!({
        "name": "<b>Ann</b>",
        "phone": "123",
        "company": "Tom & Jerry's"
    });
    let (status, _) = send(create_app(mock_server.uri()), lead_request(&lead)).await;
    assert_eq!(status, StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = sent["text"].as_str().unwrap();

    assert!(text.contains("<b>Имя:</b> &lt;b&gt;Ann&lt;/b&gt;"));
    assert!(text.contains("<b>Телефон:</b> 123"));
    assert!(text.contains("<b>Email:</b> Не указан"));
    assert!(text.contains("<b>Компания:</b> Tom &amp; Jerry&#39;s"));
    assert!(text.contains("<b>Задача:</b>\nНе указано"));
    assert_eq!(sent["chat_id"], CHAT_ID);
    assert_eq!(sent["parse_mode"], "HTML");
}

#[tokio::test]
async fn test_missing_required_fields_rejected_without_relay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cases = [
        json!({"phone": "123"}),
        json!({"name": "Ann"}),
        json!({}),
        json!({"name": "", "phone": "123"}),
        json!({"name": "Ann", "phone": "   "}),
        json!({"name": null, "phone": null, "email": "ann@example.com"}),
    ];

    for case in cases {
        let (status, body) = send(create_app(mock_server.uri()), lead_request(&case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", case);
        assert_eq!(
            body,
            json!({"success": false, "error": MISSING_FIELDS_MESSAGE}),
            "case: {}",
            case
        );
    }
}

#[tokio::test]
async fn test_malformed_body_rejected_without_relay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/send-lead")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(create_app(mock_server.uri()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], MALFORMED_BODY_MESSAGE);

    let request = lead_request(&json!({"name": ["Ann"], "phone": "123"}));
    let (status, body) = send(create_app(mock_server.uri()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], MALFORMED_BODY_MESSAGE);
}

#[tokio::test]
async fn test_telegram_rejection_passes_description_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(create_app(mock_server.uri()), lead_request(&full_lead())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "error": "Bad Request: chat not found"})
    );
}

#[tokio::test]
async fn test_telegram_rejection_without_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
        .mount(&mock_server)
        .await;

    let (status, body) = send(create_app(mock_server.uri()), lead_request(&full_lead())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": RELAY_FAILED_MESSAGE}));
}

#[tokio::test]
async fn test_non_json_telegram_response_is_internal_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let (status, body) = send(create_app(mock_server.uri()), lead_request(&full_lead())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": INTERNAL_ERROR_MESSAGE}));
}

#[tokio::test]
async fn test_unreachable_telegram_is_internal_error() {
    // Nothing listens on the discard port
    let (status, body) = send(
        create_app("http://127.0.0.1:9".to_string()),
        lead_request(&full_lead()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    assert!(!body.to_string().contains(TOKEN));
}

#[tokio::test]
async fn test_health_independent_of_telegram() {
    let app = create_app("http://127.0.0.1:9".to_string());
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_concurrent_leads_each_relayed_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(10)
        .mount(&mock_server)
        .await;

    let app = create_app(mock_server.uri());

    let mut handles = vec![];
    for i in 0..10 {
        let app = app.clone();
        let handle = tokio::spawn(async move {
            let lead = json!({"name": format!("Lead {}", i), "phone": format!("{}", i)});
            send(app, lead_request(&lead)).await
        });
        handles.push(handle);
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
