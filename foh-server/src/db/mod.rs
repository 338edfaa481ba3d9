//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk, or in-memory for tests and
//! `DATABASE_PATH=:memory:`.

pub mod models;
pub mod repository;

use std::path::Path;

use shared::models::{StaffRole, StaffStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::db::models::Staff;
use crate::db::repository::StaffRepository;
use crate::utils::AppError;

const NAMESPACE: &str = "foh";
const DATABASE: &str = "foh";

/// Tables are schemaless; the unique indexes back the repository checks.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS staff SCHEMALESS;
DEFINE INDEX IF NOT EXISTS staff_username ON TABLE staff COLUMNS username UNIQUE;

DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
DEFINE INDEX IF NOT EXISTS dining_table_number ON TABLE dining_table COLUMNS number UNIQUE;

DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE INDEX IF NOT EXISTS category_name ON TABLE category COLUMNS name UNIQUE;
DEFINE INDEX IF NOT EXISTS category_parent ON TABLE category COLUMNS parent;

DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
DEFINE INDEX IF NOT EXISTS menu_item_category ON TABLE menu_item COLUMNS category;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_table_status ON TABLE order COLUMNS table_number, status;
DEFINE INDEX IF NOT EXISTS order_created_at ON TABLE order COLUMNS created_at;
"#;

/// Database service
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the database and apply the schema
    ///
    /// `None` opens an in-memory instance.
    pub async fn new(path: Option<&Path>) -> Result<Self, AppError> {
        let db = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::database(format!("Failed to create database dir: {e}"))
                    })?;
                }
                let path_str = path.to_string_lossy().into_owned();
                let db = Surreal::new::<RocksDb>(path_str)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
                tracing::info!(path = %path.display(), "Database opened (RocksDB)");
                db
            }
            None => {
                let db = Surreal::new::<Mem>(())
                    .await
                    .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
                tracing::info!("Database opened (in-memory)");
                db
            }
        };

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Create the bootstrap admin when no admin account exists yet
    ///
    /// Returns `true` when an account was created.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let repo = StaffRepository::new(self.db.clone());
        if repo.count_active_admins().await? > 0 {
            return Ok(false);
        }

        let password_hash = Staff::hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        let now = shared::util::now_millis();
        let admin = Staff {
            id: None,
            username: username.to_string(),
            display_name: "Administrator".to_string(),
            email: None,
            phone: None,
            role: StaffRole::Admin,
            status: StaffStatus::Active,
            password_hash,
            approved_by: None,
            created_at: now,
            updated_at: now,
        };
        repo.create(admin).await?;

        tracing::info!(username = %username, "Seeded initial admin account");
        Ok(true)
    }
}
