//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use email_notification_service::config::Settings;
use email_notification_service::notification::SimulatedTransport;
use email_notification_service::server::{create_app, AppState};
use email_notification_service::storage::MemoryCollectionStore;

fn test_state(send_delay: Duration) -> AppState {
    let mut settings = Settings::default();
    settings.site.origin = "https://innovia.example".to_string();
    settings.mailer.inter_send_delay_ms = 0;

    AppState::with_backends(
        settings,
        Arc::new(MemoryCollectionStore::new()),
        Arc::new(SimulatedTransport::new(send_delay, 1.0)),
    )
}

fn test_app() -> Router {
    create_app(test_state(Duration::ZERO))
}

struct TestResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is not JSON")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is not UTF-8")
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("oneshot failed");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = test_app();

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");
    assert!(body.get("redis").is_none());
    assert_eq!(body["dispatcher"]["runs"], 0);
}

#[tokio::test]
async fn test_subscribe_then_fetch() {
    let app = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/subscribers",
        Some(json!({
            "email": "reader@example.com",
            "name": "Reader",
            "preferences": {
                "milestones": true,
                "progress": false,
                "announcements": true,
                "research": false,
                "categories": ["healthcare"]
            }
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.json()["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("sub-"));

    let response = send(&app, Method::GET, &format!("/api/v1/subscribers/{}", id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["email"], "reader@example.com");
    assert_eq!(body["status"], "active");
    assert_eq!(body["preferences"]["categories"], json!(["healthcare"]));

    let response = send(&app, Method::GET, "/api/v1/subscribers/stats", None).await;
    assert_eq!(response.json()["total"], 3);
}

#[tokio::test]
async fn test_subscribe_validation() {
    let app = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/subscribers",
        Some(json!({ "email": "not-an-email" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "VALIDATION_ERROR");

    let response = send(
        &app,
        Method::POST,
        "/api/v1/subscribers",
        Some(json!({
            "email": "reader@example.com",
            "preferences": {
                "milestones": true,
                "progress": true,
                "announcements": true,
                "research": true,
                "categories": []
            }
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_and_rejects_unknown_status() {
    let app = test_app();

    let response = send(&app, Method::GET, "/api/v1/subscribers?search=INVESTOR", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["subscribers"][0]["id"], "sub-2");

    let response = send(&app, Method::GET, "/api/v1/subscribers?status=all", None).await;
    assert_eq!(response.json()["total"], 2);

    let response = send(&app, Method::GET, "/api/v1/subscribers?status=sleeping", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_is_csv_attachment() {
    let app = test_app();

    let response = send(&app, Method::GET, "/api/v1/subscribers/export", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.content_type.as_deref(),
        Some("text/csv; charset=utf-8")
    );

    let csv = response.text();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Email,"));
    assert!(lines[1].starts_with("demo@example.com,"));
}

#[tokio::test]
async fn test_preferences_patch_and_unknown_subscriber() {
    let app = test_app();

    let response = send(
        &app,
        Method::PATCH,
        "/api/v1/subscribers/sub-2/preferences",
        Some(json!({ "research": true })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let prefs = &response.json()["preferences"];
    assert_eq!(prefs["research"], true);
    // Untouched fields keep their values
    assert_eq!(prefs["progress"], false);
    assert_eq!(prefs["categories"], json!(["company"]));

    let response = send(
        &app,
        Method::PATCH,
        "/api/v1/subscribers/sub-404/preferences",
        Some(json!({ "research": true })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsubscribe_link_is_idempotent() {
    let app = test_app();

    for _ in 0..2 {
        let response = send(&app, Method::GET, "/unsubscribe?id=sub-1", None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["status"], "unsubscribed");
    }

    let response = send(&app, Method::GET, "/unsubscribe", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, Method::GET, "/unsubscribe?id=sub-404", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, Method::GET, "/api/v1/subscribers/stats", None).await;
    let stats = response.json();
    assert_eq!(stats["active"], 1);
    assert_eq!(stats["unsubscribed"], 1);
}

#[tokio::test]
async fn test_email_preferences_page() {
    let app = test_app();

    let response = send(
        &app,
        Method::POST,
        "/email-preferences?id=sub-1",
        Some(json!({ "categories": ["team"] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, Method::GET, "/email-preferences?id=sub-1", None).await;
    let body = response.json();
    assert_eq!(body["email"], "demo@example.com");
    assert_eq!(body["preferences"]["categories"], json!(["team"]));
}

#[tokio::test]
async fn test_template_catalog_and_preview() {
    let app = test_app();

    let response = send(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(response.json()["total"], 4);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/templates/announcement-template/preview",
        Some(json!({ "variables": { "title": "New office" } })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["subject"], "📢 Important Announcement: New office");
    // Placeholders without a value are left in place
    assert!(body["textContent"]
        .as_str()
        .unwrap()
        .contains("{{readMoreUrl}}"));

    let response = send(&app, Method::GET, "/api/v1/templates/missing", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notify_update_flow() {
    let app = test_app();

    let update = json!({
        "id": "launch-2025",
        "type": "milestone",
        "category": "company",
        "title": "Seed round closed",
        "summary": "We raised our first round",
        "achievements": ["Term sheet signed", "Board formed"]
    });

    let response = send(&app, Method::POST, "/api/v1/updates/notify", Some(update)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["templateId"], "milestone-template");
    assert_eq!(body["sent"], 2);

    let response = send(
        &app,
        Method::GET,
        "/api/v1/notifications?updateId=launch-2025&status=sent",
        None,
    )
    .await;
    assert_eq!(response.json()["total"], 2);

    let response = send(&app, Method::GET, "/api/v1/notifications/stats", None).await;
    let stats = response.json();
    assert_eq!(stats["sent"], 2);
    assert_eq!(stats["pending"], 0);

    let response = send(&app, Method::GET, "/api/v1/subscribers/sub-1", None).await;
    assert!(response.json().get("lastEmailSent").is_some());
}

#[tokio::test]
async fn test_notify_without_recipients() {
    let app = test_app();

    let update = json!({
        "id": "lab-notes",
        "type": "research",
        "category": "healthcare",
        "title": "Lab notes",
        "summary": "Nothing to see"
    });

    let response = send(&app, Method::POST, "/api/v1/updates/notify", Some(update)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "outcome": "no_recipients", "updateId": "lab-notes" })
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app();

    let response = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("mailer_subscribers"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = test_app();

    let update = json!({
        "id": "huge",
        "type": "announcement",
        "category": "company",
        "title": "Huge",
        "summary": "Too long",
        "content": "x".repeat(1024 * 1024 + 1)
    });

    let response = send(&app, Method::POST, "/api/v1/updates/notify", Some(update)).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_dispatch_completes_after_client_disconnects() {
    let state = test_state(Duration::from_millis(100));
    let app = create_app(state.clone());

    let update = json!({
        "id": "board-news",
        "type": "announcement",
        "category": "company",
        "title": "Board news",
        "summary": "New members"
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/updates/notify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(update.to_string()))
        .unwrap();

    // The client gives up while the first send is still in flight
    let result = tokio::time::timeout(Duration::from_millis(50), app.oneshot(request)).await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(500)).await;

    let stats = state.notifications.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.sent, 2);
    assert_eq!(stats.pending, 0);
}
