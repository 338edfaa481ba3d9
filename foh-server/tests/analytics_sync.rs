//! Analytics summary and sync broadcasts

mod common;

use common::{TestApp, key};
use http::{Method, StatusCode};
use serde_json::json;
use shared::message::{EventType, SyncPayload};

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_summary_counts_completed_revenue() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (curry, rice) = app.seed_menu(&admin).await;
    app.create_table(&admin, 1).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let (_, order) = app
            .post(
                "/api/orders",
                &admin,
                json!({
                    "table_number": 1,
                    "customer_name": "Ana",
                    "items": [
                        { "menu_item_id": curry, "quantity": 2 },
                        { "menu_item_id": rice, "quantity": 1 }
                    ]
                }),
            )
            .await;
        ids.push(order["id"].as_str().unwrap().to_string());
    }
    for target in ["confirmed", "preparing", "ready", "served", "completed"] {
        app.post(
            &format!("/api/orders/{}/transition", key(&ids[0])),
            &admin,
            json!({ "status": target }),
        )
        .await;
    }
    app.post(
        &format!("/api/orders/{}/transition", key(&ids[1])),
        &admin,
        json!({ "status": "cancelled", "reason": "no show" }),
    )
    .await;

    let day = today();
    let (status, summary) = app
        .get(&format!("/api/analytics/summary?from={day}&to={day}"), &admin)
        .await;
    assert_eq!(status, StatusCode::OK, "{summary}");
    assert_eq!(summary["total_orders"], 2);
    assert_eq!(summary["completed_orders"], 1);
    assert_eq!(summary["cancelled_orders"], 1);
    assert_eq!(summary["revenue"], 28.25);
    assert_eq!(summary["average_order_value"], 28.25);
    assert_eq!(summary["revenue_by_day"].as_array().unwrap().len(), 1);
    assert_eq!(summary["top_items"][0]["name"], "Curry");
    assert_eq!(summary["top_items"][0]["quantity"], 2);
    assert_eq!(summary["top_tables"][0]["table_number"], 1);
    assert_eq!(summary["top_tables"][0]["orders"], 1);
}

#[tokio::test]
async fn test_summary_access_and_range() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let chef = app.staff_token(&admin, "chef9", "chef").await;
    let day = today();

    let (status, _) = app
        .get(&format!("/api/analytics/summary?from={day}&to={day}"), &chef)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/analytics/summary?from={day}&to=2020-01-01"), &admin)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, summary) = app
        .get("/api/analytics/summary?from=2024-02-01&to=2024-02-29", &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_orders"], 0);
    assert_eq!(summary["revenue_by_day"].as_array().unwrap().len(), 29);
}

#[tokio::test]
async fn test_writes_are_broadcast_with_versions() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let mut rx = app.state.message_bus().subscribe();

    let table = app.create_table(&admin, 4).await;
    app.put(
        &format!("/api/tables/{}/status", key(&table)),
        &admin,
        json!({ "status": "reserved" }),
    )
    .await;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.event_type, EventType::Sync);
    let created: SyncPayload = first.parse_payload().unwrap();
    assert_eq!(created.resource, "dining_table");
    assert_eq!(created.action, "created");
    assert_eq!(created.version, 1);
    assert_eq!(created.id, table);

    let updated: SyncPayload = rx.recv().await.unwrap().parse_payload().unwrap();
    assert_eq!(updated.action, "updated");
    assert_eq!(updated.version, 2);
    assert_eq!(updated.data.unwrap()["status"], "reserved");

    let (status, body) = app.get("/api/sync/versions", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["versions"]["dining_table"], 2);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.request(Method::GET, "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["message_bus"]["status"], "ok");
}

#[tokio::test]
async fn test_websocket_requires_valid_token() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(Method::GET, "/api/sync/ws?token=bogus", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
