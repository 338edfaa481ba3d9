//! Authentication Routes
//!
//! - /api/auth/login, /api/auth/register: public
//! - /api/auth/me, /api/auth/logout: authenticated (global `require_auth`)

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
