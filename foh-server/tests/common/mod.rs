//! Test harness: in-memory database, full router driven with `oneshot`

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use foh_server::{Config, ServerState, api};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    _work_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let work_dir = tempfile::tempdir().expect("tempdir");
        let config = Config::for_tests(work_dir.path().to_string_lossy().to_string());
        let state = ServerState::initialize(&config)
            .await
            .expect("state initializes");
        let app = api::build_app(&state);
        Self {
            state,
            app,
            _work_dir: work_dir,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Register, approve and log in a staff member
    pub async fn staff_token(&self, admin: &str, username: &str, role: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "password": "password1",
                    "display_name": username,
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = body["id"].as_str().expect("id").to_string();

        let (status, body) = self
            .post(&format!("/api/staff/{id}/approve"), admin, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (status, body) = self.login(username, "password1").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Category "Mains" with two visible items; returns their ids
    pub async fn seed_menu(&self, admin: &str) -> (String, String) {
        let (status, body) = self
            .post("/api/categories", admin, json!({ "name": "Mains" }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (_, curry) = self
            .post(
                "/api/menu-items",
                admin,
                json!({ "name": "Curry", "price": 12.5, "category": "Mains" }),
            )
            .await;
        let (_, rice) = self
            .post(
                "/api/menu-items",
                admin,
                json!({ "name": "Rice", "price": 3.25, "category": "Mains" }),
            )
            .await;
        (
            curry["id"].as_str().expect("curry id").to_string(),
            rice["id"].as_str().expect("rice id").to_string(),
        )
    }

    pub async fn create_table(&self, admin: &str, number: i32) -> String {
        let (status, body) = self
            .post("/api/tables", admin, json!({ "number": number }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().expect("table id").to_string()
    }

    pub async fn table_status(&self, token: &str, id: &str) -> String {
        let (_, body) = self.get(&format!("/api/tables/{id}"), token).await;
        body["status"].as_str().unwrap_or_default().to_string()
    }
}

/// Record key of a "table:key" id, safe to put in a URL path
pub fn key(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

pub fn code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap_or_default()
}
