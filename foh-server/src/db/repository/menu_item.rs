//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::MenuItem;
use shared::models::MenuItemQuery;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List menu items, optionally filtered by category name and visibility
    pub async fn find_all(&self, query: &MenuItemQuery) -> RepoResult<Vec<MenuItem>> {
        let mut conditions = Vec::new();
        if query.category.is_some() {
            conditions.push("(category = $category OR subcategory = $category)");
        }
        if query.visible_only {
            conditions.push("is_visible = true");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT * FROM menu_item{where_clause} ORDER BY name");
        let mut q = self.base.db().query(sql);
        if let Some(category) = &query.category {
            q = q.bind(("category", category.clone()));
        }
        let items: Vec<MenuItem> = q.await?.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = parse_id(TABLE, id)?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Items whose category or subcategory is `name`
    pub async fn count_in_category(&self, name: &str) -> RepoResult<usize> {
        self.base
            .count(
                "SELECT count() FROM menu_item WHERE category = $name OR subcategory = $name GROUP ALL",
                vec![("name", name.into())],
            )
            .await
    }

    pub async fn create(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Overwrite a stored item
    pub async fn save(&self, mut item: MenuItem) -> RepoResult<MenuItem> {
        let thing = item
            .id
            .take()
            .ok_or_else(|| RepoError::Validation("Menu item has no ID".to_string()))?;
        let id = thing.to_string();
        let updated: Option<MenuItem> = self.base.db().update(thing).content(item).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    /// Cascade a category rename to `category` and `subcategory`
    ///
    /// Returns the updated items.
    pub async fn rename_category(&self, old: &str, new: &str) -> RepoResult<Vec<MenuItem>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE menu_item SET category = $new, updated_at = $now WHERE category = $old")
            .query("UPDATE menu_item SET subcategory = $new, updated_at = $now WHERE subcategory = $old")
            .bind(("old", old.to_string()))
            .bind(("new", new.to_string()))
            .bind(("now", shared::util::now_millis()))
            .await?;
        let mut updated: Vec<MenuItem> = result.take(0)?;
        let sub: Vec<MenuItem> = result.take(1)?;
        for item in sub {
            match updated.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item,
                None => updated.push(item),
            }
        }
        Ok(updated)
    }
}
