//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category derived from the code range
///
/// Unused ranges (3xxx, 5xxx) fall back to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Order errors (4xxx)
    Order,
    /// Menu and category errors (6xxx)
    Menu,
    /// Table errors (7xxx)
    Table,
    /// Staff errors (8xxx)
    Staff,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Order,
            6000..7000 => Self::Menu,
            7000..8000 => Self::Table,
            8000..9000 => Self::Staff,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Order => "order",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4012), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(6105), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(7004), ErrorCategory::Table);
        assert_eq!(ErrorCategory::from_code(8004), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::AccountRejected.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::InvalidStatusTransition.category(),
            ErrorCategory::Order
        );
        assert_eq!(ErrorCode::CategoryHasItems.category(), ErrorCategory::Menu);
        assert_eq!(ErrorCode::LastAdmin.category(), ErrorCategory::Staff);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Menu).unwrap();
        assert_eq!(json, "\"menu\"");
        let parsed: ErrorCategory = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(parsed, ErrorCategory::Staff);
        assert_eq!(parsed.name(), "staff");
    }
}
