//! Staff Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Staff;
use shared::models::StaffQuery;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "staff";

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self, query: &StaffQuery) -> RepoResult<Vec<Staff>> {
        let mut conditions = Vec::new();
        if query.role.is_some() {
            conditions.push("role = $role");
        }
        if query.status.is_some() {
            conditions.push("status = $status");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let staff: Vec<Staff> = self
            .base
            .db()
            .query(format!("SELECT * FROM staff{where_clause} ORDER BY username"))
            .bind(("role", query.role.map(|r| r.as_str().to_string())))
            .bind(("status", query.status.map(|s| s.as_str().to_string())))
            .await?
            .take(0)?;
        Ok(staff)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Staff>> {
        let thing = parse_id(TABLE, id)?;
        let staff: Option<Staff> = self.base.db().select(thing).await?;
        Ok(staff)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Staff>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let staff: Vec<Staff> = result.take(0)?;
        Ok(staff.into_iter().next())
    }

    pub async fn count_active_admins(&self) -> RepoResult<usize> {
        self.base
            .count(
                "SELECT count() FROM staff WHERE role = 'admin' AND status = 'active' GROUP ALL",
                Vec::new(),
            )
            .await
    }

    /// Insert a staff record including its password hash
    pub async fn create(&self, staff: Staff) -> RepoResult<Staff> {
        if self.find_by_username(&staff.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                staff.username
            )));
        }
        let created: Option<Staff> = self
            .base
            .db()
            .create(TABLE)
            .content(staff.to_document())
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff".to_string()))
    }

    /// Merge a partial document; fields not in `patch` (the password hash
    /// included) are left alone.
    pub async fn merge(&self, id: &str, patch: serde_json::Value) -> RepoResult<Staff> {
        let thing = parse_id(TABLE, id)?;
        let updated: Option<Staff> = self.base.db().update(thing).merge(patch).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<Staff> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
