//! Client-related types shared between server and client
//!
//! Request/response bodies of the auth API.

use serde::{Deserialize, Serialize};

use crate::models::{StaffRole, StaffStatus};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: StaffRole,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Self-registration request (account starts as pending)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: StaffRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Registration result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub status: StaffStatus,
}
