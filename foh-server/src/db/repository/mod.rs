//! Repository Module
//!
//! CRUD access to the SurrealDB tables. Business rules live in the services
//! and handlers; repositories only enforce uniqueness.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod staff;

pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use staff::StaffRepository;

use shared::ErrorCode;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // unique index violation
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:key" 格式
// =============================================================================
//
//   - 解析: parse_id("menu_item", "menu_item:abc") 或 parse_id("menu_item", "abc")
//   - 输出: doc.id_string() -> "menu_item:abc"
//   - 其它文档引用 (order.items[].menu_item_id, category.parent) 存为字符串

/// Parse "table:key" (or a bare key) and check it belongs to `table`
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if !id.contains(':') {
        if id.is_empty() {
            return Err(RepoError::Validation("Empty ID".to_string()));
        }
        return Ok(RecordId::from_table_key(table, id));
    }

    let record: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "ID {} does not belong to {}",
            id, table
        )));
    }
    Ok(record)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// `SELECT count() ... GROUP ALL` helper
    pub async fn count(
        &self,
        sql: &str,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<usize> {
        let mut query = self.db.query(sql);
        for (key, value) in binds {
            query = query.bind((key, value));
        }
        let count: Option<i64> = query.await?.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = parse_id("dining_table", "dining_table:t1").unwrap();
        assert_eq!(id.to_string(), "dining_table:t1");

        let bare = parse_id("dining_table", "t1").unwrap();
        assert_eq!(bare, id);

        assert!(parse_id("dining_table", "staff:t1").is_err());
        assert!(parse_id("dining_table", "").is_err());
    }

    #[test]
    fn test_repo_error_codes() {
        let err: AppError = RepoError::Duplicate("x".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        let err: AppError = RepoError::Database("x".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
