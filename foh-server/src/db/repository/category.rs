//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Category;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = parse_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Direct children of a category
    pub async fn find_children(&self, parent_id: &str) -> RepoResult<Vec<Category>> {
        let children: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE parent = $parent ORDER BY name")
            .bind(("parent", parent_id.to_string()))
            .await?
            .take(0)?;
        Ok(children)
    }

    pub async fn create(&self, category: Category) -> RepoResult<Category> {
        if self.find_by_name(&category.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Overwrite a stored category, keeping names unique
    pub async fn save(&self, mut category: Category) -> RepoResult<Category> {
        if let Some(found) = self.find_by_name(&category.name).await?
            && found.id != category.id
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        let thing = category
            .id
            .take()
            .ok_or_else(|| RepoError::Validation("Category has no ID".to_string()))?;
        let id = thing.to_string();
        let updated: Option<Category> = self.base.db().update(thing).content(category).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<Category> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
