//! Menu service
//!
//! Menu items reference categories by name, so a category rename rewrites
//! the `category` / `subcategory` fields of its items.

use shared::ErrorCode;
use shared::models::{CategoryCreate, CategoryUpdate, MenuItemCreate, MenuItemQuery, MenuItemUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::catalog::{
    MenuSection, build_public_menu, check_parent, check_price, check_rating, check_subcategory,
};
use crate::db::models::{Category, MenuItem};
use crate::db::repository::{CategoryRepository, MenuItemRepository, RepoError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, normalize_optional, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Result of a category update
#[derive(Debug, Clone)]
pub struct CategoryChange {
    pub category: Category,
    /// Items rewritten by a rename
    pub renamed_items: Vec<MenuItem>,
}

#[derive(Clone)]
pub struct MenuService {
    items: MenuItemRepository,
    categories: CategoryRepository,
}

impl MenuService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            items: MenuItemRepository::new(db.clone()),
            categories: CategoryRepository::new(db),
        }
    }

    // ── Public menu ─────────────────────────────────────────────────

    pub async fn public_menu(&self) -> AppResult<Vec<MenuSection>> {
        let categories = self.categories.find_all().await?;
        let items = self
            .items
            .find_all(&MenuItemQuery {
                category: None,
                visible_only: true,
            })
            .await?;
        Ok(build_public_menu(&categories, items))
    }

    // ── Menu items ──────────────────────────────────────────────────

    pub async fn list_items(&self, query: &MenuItemQuery) -> AppResult<Vec<MenuItem>> {
        Ok(self.items.find_all(query).await?)
    }

    pub async fn get_item(&self, id: &str) -> AppResult<MenuItem> {
        self.items.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        })
    }

    pub async fn create_item(&self, payload: MenuItemCreate) -> AppResult<MenuItem> {
        let name = payload.name.trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        check_price(payload.price)?;
        check_rating(payload.rating)?;
        let description = normalize_optional(payload.description);
        let image_url = normalize_optional(payload.image_url);
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&image_url, "image_url", MAX_URL_LEN)?;

        let category = payload.category.trim().to_string();
        let subcategory = normalize_optional(payload.subcategory);
        self.check_item_categories(&category, subcategory.as_deref())
            .await?;

        let now = now_millis();
        let item = MenuItem {
            id: None,
            name,
            price: payload.price,
            category,
            subcategory,
            description,
            is_vegetarian: payload.is_vegetarian,
            is_spicy: payload.is_spicy,
            is_visible: payload.is_visible.unwrap_or(true),
            rating: payload.rating,
            image_url,
            created_at: now,
            updated_at: now,
        };
        let item = self.items.create(item).await?;
        tracing::info!(id = %item.id_string(), name = %item.name, "Menu item created");
        Ok(item)
    }

    pub async fn update_item(&self, id: &str, payload: MenuItemUpdate) -> AppResult<MenuItem> {
        let mut item = self.get_item(id).await?;

        if let Some(name) = payload.name {
            let name = name.trim().to_string();
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            item.name = name;
        }
        if let Some(price) = payload.price {
            check_price(price)?;
            item.price = price;
        }
        if payload.rating.is_some() {
            check_rating(payload.rating)?;
            item.rating = payload.rating;
        }
        if let Some(description) = payload.description {
            let description = normalize_optional(Some(description));
            validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
            item.description = description;
        }
        if let Some(url) = payload.image_url {
            let url = normalize_optional(Some(url));
            validate_optional_text(&url, "image_url", MAX_URL_LEN)?;
            item.image_url = url;
        }
        if let Some(v) = payload.is_vegetarian {
            item.is_vegetarian = v;
        }
        if let Some(v) = payload.is_spicy {
            item.is_spicy = v;
        }
        if let Some(v) = payload.is_visible {
            item.is_visible = v;
        }

        let category_changed = payload.category.is_some() || payload.subcategory.is_some();
        if let Some(category) = payload.category {
            item.category = category.trim().to_string();
        }
        if let Some(sub) = payload.subcategory {
            // "" clears
            item.subcategory = normalize_optional(Some(sub));
        }
        if category_changed {
            self.check_item_categories(&item.category, item.subcategory.as_deref())
                .await?;
        }

        item.updated_at = now_millis();
        Ok(self.items.save(item).await?)
    }

    pub async fn delete_item(&self, id: &str) -> AppResult<MenuItem> {
        let item = self.get_item(id).await?;
        self.items.delete(id).await?;
        tracing::info!(id = %item.id_string(), name = %item.name, "Menu item deleted");
        Ok(item)
    }

    async fn check_item_categories(&self, category: &str, subcategory: Option<&str>) -> AppResult<()> {
        let parent = self.find_category_by_name(category).await?;
        if let Some(sub) = subcategory {
            let child = self.find_category_by_name(sub).await?;
            check_subcategory(&parent, &child)?;
        }
        Ok(())
    }

    async fn find_category_by_name(&self, name: &str) -> AppResult<Category> {
        self.categories.find_by_name(name).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category '{name}' not found"))
                .with_detail("name", name)
        })
    }

    // ── Categories ──────────────────────────────────────────────────

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get_category(&self, id: &str) -> AppResult<Category> {
        self.categories.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        })
    }

    pub async fn create_category(&self, payload: CategoryCreate) -> AppResult<Category> {
        let name = payload.name.trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        let description = normalize_optional(payload.description);
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

        let parent = match normalize_optional(payload.parent) {
            Some(parent_id) => {
                let parent = self.get_category(&parent_id).await?;
                check_parent(None, &parent, false)?;
                Some(parent.id_string())
            }
            None => None,
        };

        let now = now_millis();
        let category = Category {
            id: None,
            name,
            description,
            parent,
            is_active: payload.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        let category = self.categories.create(category).await.map_err(name_exists)?;
        tracing::info!(id = %category.id_string(), name = %category.name, "Category created");
        Ok(category)
    }

    /// Update a category; a rename is cascaded to its menu items
    pub async fn update_category(
        &self,
        id: &str,
        payload: CategoryUpdate,
    ) -> AppResult<CategoryChange> {
        let mut category = self.get_category(id).await?;
        let category_id = category.id_string();
        let old_name = category.name.clone();

        if let Some(name) = payload.name {
            let name = name.trim().to_string();
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            category.name = name;
        }
        if let Some(description) = payload.description {
            let description = normalize_optional(Some(description));
            validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
            category.description = description;
        }
        if let Some(active) = payload.is_active {
            category.is_active = active;
        }
        if let Some(parent) = payload.parent {
            let new_parent = match normalize_optional(Some(parent)) {
                Some(parent_id) => {
                    let parent = self.get_category(&parent_id).await?;
                    let has_children = !self.categories.find_children(&category_id).await?.is_empty();
                    check_parent(Some(&category_id), &parent, has_children)?;
                    Some(parent.id_string())
                }
                None => None,
            };
            if new_parent != category.parent {
                // items pair a category with one of its own children
                let items = self.items.count_in_category(&old_name).await?;
                if items > 0 {
                    return Err(AppError::with_message(
                        ErrorCode::CategoryHasItems,
                        format!("Category '{old_name}' has {items} menu items, move them first"),
                    ));
                }
            }
            category.parent = new_parent;
        }

        category.updated_at = now_millis();
        let category = self.categories.save(category).await.map_err(name_exists)?;

        let renamed_items = if category.name != old_name {
            let items = self.items.rename_category(&old_name, &category.name).await?;
            tracing::info!(
                from = %old_name,
                to = %category.name,
                items = items.len(),
                "Category renamed"
            );
            items
        } else {
            Vec::new()
        };

        Ok(CategoryChange {
            category,
            renamed_items,
        })
    }

    /// Delete a category without subcategories or menu items
    pub async fn delete_category(&self, id: &str) -> AppResult<Category> {
        let category = self.get_category(id).await?;

        let children = self.categories.find_children(&category.id_string()).await?;
        if !children.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::CategoryHasChildren,
                format!("Category '{}' has {} subcategories", category.name, children.len()),
            ));
        }
        let items = self.items.count_in_category(&category.name).await?;
        if items > 0 {
            return Err(AppError::with_message(
                ErrorCode::CategoryHasItems,
                format!("Category '{}' has {} menu items", category.name, items),
            ));
        }

        self.categories.delete(id).await?;
        tracing::info!(id = %category.id_string(), name = %category.name, "Category deleted");
        Ok(category)
    }
}

fn name_exists(e: RepoError) -> AppError {
    match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CategoryNameExists, msg),
        other => other.into(),
    }
}
