//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu category document (分类)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Parent category id ("category:xxx"); top level when `None`
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}
