//! Staff Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{StaffRole, StaffStatus};
use surrealdb::RecordId;

/// Staff document (员工)
///
/// `password_hash` is read from the database but never serialized, so API
/// responses cannot leak it. Writes that touch it go through
/// [`Staff::to_document`] or a `MERGE` patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: StaffRole,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Staff {
    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }

    /// Full document including the password hash, for `CREATE`
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = doc.as_object_mut() {
            map.insert(
                "password_hash".to_string(),
                serde_json::Value::String(self.password_hash.clone()),
            );
        }
        doc
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}
