//! Menu catalog rules

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use shared::ErrorCode;
use shared::order::money::validate_price;

use crate::db::models::{Category, MenuItem};
use crate::utils::AppError;

/// Ratings are on a five-star scale
pub const MAX_RATING: f32 = 5.0;

/// One category of the public menu
#[derive(Debug, Clone, Serialize)]
pub struct MenuSection {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<MenuItem>,
}

pub fn check_price(price: f64) -> Result<(), AppError> {
    validate_price(price).map_err(|e| {
        AppError::with_message(ErrorCode::MenuItemInvalidPrice, e.to_string())
            .with_detail("price", price)
    })
}

pub fn check_rating(rating: Option<f32>) -> Result<(), AppError> {
    match rating {
        Some(r) if !r.is_finite() || !(0.0..=MAX_RATING).contains(&r) => Err(
            AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("rating must be between 0 and {MAX_RATING}"),
            )
            .with_detail("field", "rating"),
        ),
        _ => Ok(()),
    }
}

/// Validate a new parent for `category`
///
/// Only one nesting level: the parent must be top level and a category
/// that already has children cannot move under another one.
pub fn check_parent(
    category_id: Option<&str>,
    parent: &Category,
    has_children: bool,
) -> Result<(), AppError> {
    let parent_id = parent.id_string();
    if category_id == Some(parent_id.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::CategoryInvalidParent,
            "A category cannot be its own parent",
        ));
    }
    if !parent.is_top_level() {
        return Err(AppError::with_message(
            ErrorCode::CategoryNestingTooDeep,
            format!("'{}' is already a subcategory", parent.name),
        )
        .with_detail("parent", parent_id));
    }
    if has_children {
        return Err(AppError::with_message(
            ErrorCode::CategoryNestingTooDeep,
            "A category with subcategories cannot become a subcategory",
        ));
    }
    Ok(())
}

/// Check that `subcategory` names a child of `category`
pub fn check_subcategory(category: &Category, subcategory: &Category) -> Result<(), AppError> {
    if subcategory.parent.as_deref() != Some(category.id_string().as_str()) {
        return Err(AppError::validation(format!(
            "'{}' is not a subcategory of '{}'",
            subcategory.name, category.name
        ))
        .with_detail("field", "subcategory"));
    }
    Ok(())
}

/// Customer-facing menu
///
/// Visible items whose category (and subcategory, when set) is active,
/// grouped by category name. Sections and items are sorted by name.
pub fn build_public_menu(categories: &[Category], items: Vec<MenuItem>) -> Vec<MenuSection> {
    let by_name: HashMap<&str, &Category> =
        categories.iter().map(|c| (c.name.as_str(), c)).collect();
    let is_active = |name: &str| by_name.get(name).is_some_and(|c| c.is_active);

    let mut sections: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        if !item.is_visible || !is_active(&item.category) {
            continue;
        }
        if let Some(sub) = &item.subcategory
            && !is_active(sub)
        {
            continue;
        }
        sections.entry(item.category.clone()).or_default().push(item);
    }

    sections
        .into_iter()
        .map(|(category, mut items)| {
            items.sort_by(|a, b| a.name.cmp(&b.name));
            let description = by_name
                .get(category.as_str())
                .and_then(|c| c.description.clone());
            MenuSection {
                category,
                description,
                items,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn category(key: &str, name: &str, parent: Option<&str>, active: bool) -> Category {
        Category {
            id: Some(RecordId::from_table_key("category", key)),
            name: name.into(),
            description: None,
            parent: parent.map(str::to_string),
            is_active: active,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn item(name: &str, category: &str, sub: Option<&str>, visible: bool) -> MenuItem {
        MenuItem {
            id: None,
            name: name.into(),
            price: 5.0,
            category: category.into(),
            subcategory: sub.map(str::to_string),
            description: None,
            is_vegetarian: false,
            is_spicy: false,
            is_visible: visible,
            rating: None,
            image_url: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_check_parent() {
        let mains = category("mains", "Mains", None, true);
        let curries = category("curries", "Curries", Some("category:mains"), true);

        assert!(check_parent(Some("category:drinks"), &mains, false).is_ok());
        assert!(check_parent(None, &mains, false).is_ok());

        let err = check_parent(Some("category:mains"), &mains, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryInvalidParent);

        let err = check_parent(Some("category:x"), &curries, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNestingTooDeep);

        let err = check_parent(Some("category:drinks"), &mains, true).unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNestingTooDeep);
    }

    #[test]
    fn test_check_subcategory() {
        let mains = category("mains", "Mains", None, true);
        let curries = category("curries", "Curries", Some("category:mains"), true);
        let drinks = category("drinks", "Drinks", None, true);
        assert!(check_subcategory(&mains, &curries).is_ok());
        assert!(check_subcategory(&drinks, &curries).is_err());
    }

    #[test]
    fn test_price_and_rating() {
        assert!(check_price(12.5).is_ok());
        assert_eq!(
            check_price(-1.0).unwrap_err().code,
            ErrorCode::MenuItemInvalidPrice
        );
        assert!(check_price(f64::NAN).is_err());

        assert!(check_rating(None).is_ok());
        assert!(check_rating(Some(4.5)).is_ok());
        assert_eq!(
            check_rating(Some(5.5)).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_public_menu_groups_and_filters() {
        let categories = vec![
            category("mains", "Mains", None, true),
            category("curries", "Curries", Some("category:mains"), false),
            category("drinks", "Drinks", None, true),
            category("old", "Seasonal", None, false),
        ];
        let items = vec![
            item("Naan", "Mains", None, true),
            item("Dal", "Mains", None, true),
            item("Korma", "Mains", Some("Curries"), true),
            item("Lassi", "Drinks", None, true),
            item("Secret", "Drinks", None, false),
            item("Pumpkin Soup", "Seasonal", None, true),
            item("Orphan", "Missing", None, true),
        ];

        let menu = build_public_menu(&categories, items);
        let names: Vec<_> = menu.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Drinks", "Mains"]);

        let mains: Vec<_> = menu[1].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(mains, vec!["Dal", "Naan"]);
        assert_eq!(menu[0].items.len(), 1);
    }
}
