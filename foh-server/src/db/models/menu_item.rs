//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item document (菜品)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
    /// Category name
    pub category: String,
    /// Child category name
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_spicy: bool,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_visible: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}
