//! Category Model

use serde::{Deserialize, Serialize};

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    /// Parent category id ("category:xxx"); only top-level categories can be parents
    pub parent: Option<String>,
    pub is_active: Option<bool>,
}

/// Update category payload
///
/// `parent: Some("")` moves the category back to the top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub is_active: Option<bool>,
}
