//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::DiningTable;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = parse_id(TABLE, id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    pub async fn find_by_number(&self, number: i32) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    pub async fn create(&self, table: DiningTable) -> RepoResult<DiningTable> {
        if self.find_by_number(table.number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                table.number
            )));
        }
        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Overwrite a stored table, keeping numbers unique
    pub async fn save(&self, mut table: DiningTable) -> RepoResult<DiningTable> {
        if let Some(found) = self.find_by_number(table.number).await?
            && found.id != table.id
        {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                table.number
            )));
        }

        let thing = table
            .id
            .take()
            .ok_or_else(|| RepoError::Validation("Dining table has no ID".to_string()))?;
        let id = thing.to_string();
        let updated: Option<DiningTable> = self.base.db().update(thing).content(table).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<DiningTable> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
