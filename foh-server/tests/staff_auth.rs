//! Registration, approval, login and staff administration

mod common;

use common::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, code, key};
use http::{Method, StatusCode};
use serde_json::{Value, json};

async fn register(app: &TestApp, username: &str, role: &str) -> (StatusCode, Value) {
    app.request(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "password": "password1",
            "display_name": "New Hire",
            "role": role,
            "email": "hire@example.com"
        })),
    )
    .await
}

#[tokio::test]
async fn test_seeded_admin_logs_in() {
    let app = TestApp::new().await;
    let (status, body) = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["permissions"], json!(["all"]));
    assert!(body["expires_in"].as_i64().unwrap() > 0);

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], ADMIN_USERNAME);
}

#[tokio::test]
async fn test_login_failures_share_one_answer() {
    let app = TestApp::new().await;

    let (status, wrong_password) = app.login(ADMIN_USERNAME, "nope-nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown_user) = app.login("ghost", "nope-nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(code(&wrong_password), 1002);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn test_registration_approval_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = register(&app, "cashier1", "cashier").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = register(&app, "cashier1", "waiter").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), 8002);

    let (status, body) = app.login("cashier1", "password1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 1008);

    let (_, pending) = app.get("/api/staff?status=pending", &admin).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert!(pending[0].get("password_hash").is_none());

    let (status, body) = app
        .post(&format!("/api/staff/{}/approve", key(&id)), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "active");
    assert!(body["approved_by"].is_string());

    let (status, body) = app.login("cashier1", "password1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["user"]["permissions"]
            .as_array()
            .unwrap()
            .contains(&json!("orders:settle"))
    );

    let (status, body) = app
        .post(&format!("/api/staff/{}/reject", key(&id)), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, body) = app.login("cashier1", "password1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 1009);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let (status, _) = register(&app, "boss", "admin").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "shorty",
                "password": "123",
                "display_name": "S",
                "role": "waiter"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 1010);
}

#[tokio::test]
async fn test_staff_admin_requires_admin() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let waiter = app.staff_token(&admin, "waiter3", "waiter").await;

    let (status, _) = app.get("/api/staff", &waiter).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request(Method::GET, "/api/staff", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1001);

    let (status, body) = app.get("/api/staff", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1004);
}

#[tokio::test]
async fn test_last_admin_protection() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, me) = app.get("/api/auth/me", &admin).await;
    let admin_id = me["id"].as_str().unwrap().to_string();

    let (status, body) = app.delete(&format!("/api/staff/{}", key(&admin_id)), &admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 8003);

    let (status, body) = app
        .put(&format!("/api/staff/{}", key(&admin_id)), &admin, json!({ "role": "waiter" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), 8004);

    // a second admin makes demotion possible
    let (_, body) = register(&app, "second", "waiter").await;
    let second = body["id"].as_str().unwrap().to_string();
    app.post(&format!("/api/staff/{}/approve", key(&second)), &admin, json!({}))
        .await;
    let (status, body) = app
        .put(&format!("/api/staff/{}", key(&second)), &admin, json!({ "role": "admin" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app
        .put(&format!("/api/staff/{}", key(&admin_id)), &admin, json!({ "role": "cashier" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["role"], "cashier");
}

#[tokio::test]
async fn test_password_change() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.staff_token(&admin, "chef2", "chef").await;

    let (_, list) = app.get("/api/staff?role=chef", &admin).await;
    let id = list[0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/staff/{}", key(&id)), &admin, json!({ "password": "newsecret" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login("chef2", "password1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login("chef2", "newsecret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejected_staff_token_stops_working() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, rice) = app.seed_menu(&admin).await;
    app.create_table(&admin, 3).await;
    let waiter = app.staff_token(&admin, "waiter7", "waiter").await;
    let (_, me) = app.get("/api/auth/me", &waiter).await;
    let waiter_id = me["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(&format!("/api/staff/{}/reject", key(&waiter_id)), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app
        .post(
            "/api/orders",
            &waiter,
            json!({
                "table_number": 3,
                "customer_name": "Ana",
                "items": [{ "menu_item_id": rice, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
    assert_eq!(code(&body), 1009);

    let (status, _) = app.get("/api/auth/me", &waiter).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_staff_token_stops_working() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let chef = app.staff_token(&admin, "chef9", "chef").await;
    let (_, me) = app.get("/api/auth/me", &chef).await;
    let chef_id = me["id"].as_str().unwrap().to_string();

    let (status, _) = app.delete(&format!("/api/staff/{}", key(&chef_id)), &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/tables", &chef).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1004);
}

#[tokio::test]
async fn test_demoted_admin_loses_staff_access() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (_, body) = register(&app, "deputy", "waiter").await;
    let deputy_id = body["id"].as_str().unwrap().to_string();
    app.post(&format!("/api/staff/{}/approve", key(&deputy_id)), &admin, json!({}))
        .await;
    let (status, _) = app
        .put(&format!("/api/staff/{}", key(&deputy_id)), &admin, json!({ "role": "admin" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, login) = app.login("deputy", "password1").await;
    let deputy = login["token"].as_str().unwrap().to_string();
    let (status, _) = app.get("/api/staff", &deputy).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(&format!("/api/staff/{}", key(&deputy_id)), &admin, json!({ "role": "waiter" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/staff", &deputy).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, me) = app.get("/api/auth/me", &deputy).await;
    assert_eq!(me["role"], "waiter");
}
