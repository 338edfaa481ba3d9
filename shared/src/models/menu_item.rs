//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    /// Category name
    pub category: String,
    /// Child category name
    pub subcategory: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_spicy: bool,
    pub is_visible: Option<bool>,
    pub rating: Option<f32>,
    pub image_url: Option<String>,
}

/// Update menu item payload
///
/// `subcategory: Some("")` clears the subcategory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_spicy: Option<bool>,
    pub is_visible: Option<bool>,
    pub rating: Option<f32>,
    pub image_url: Option<String>,
}

/// Menu item list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub visible_only: bool,
}
