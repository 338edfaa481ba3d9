//! Unified error codes for the front-of-house service
//!
//! Codes are shared by the server and every client (waiter tablets, kitchen
//! display, cashier). They are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Menu / category errors
//! - 7xxx: Table errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so that non-Rust clients can match on numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Registration is waiting for admin approval
    AccountPending = 1008,
    /// Registration was rejected by an admin
    AccountRejected = 1009,
    /// Password too short
    PasswordTooShort = 1010,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has been cancelled
    OrderCancelled = 4004,
    /// Order has no items
    OrderEmpty = 4007,
    /// Status change not allowed by the order lifecycle
    InvalidStatusTransition = 4010,
    /// Items can no longer be changed in the current status
    OrderItemsLocked = 4011,
    /// Order was modified by someone else
    OrderVersionConflict = 4012,
    /// Line item quantity out of range
    InvalidQuantity = 4013,
    /// Order is already in the requested status
    OrderAlreadyInStatus = 4014,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is hidden from the menu
    MenuItemUnavailable = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category still has menu items
    CategoryHasItems = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Category still has child categories
    CategoryHasChildren = 6104,
    /// Only one level of category nesting is supported
    CategoryNestingTooDeep = 6105,
    /// Parent category is invalid (self reference)
    CategoryInvalidParent = 6106,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Table number already exists
    TableNumberExists = 7003,
    /// Table has active orders
    TableHasOrders = 7004,
    /// Table cannot take orders (maintenance)
    TableUnavailable = 7005,
    /// Table status change not allowed
    InvalidTableStatusChange = 7006,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff username already exists
    StaffUsernameExists = 8002,
    /// Cannot delete self
    StaffCannotDeleteSelf = 8003,
    /// Last active admin cannot be removed or demoted
    LastAdmin = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Client disconnected
    ClientDisconnected = 9301,
}

impl ErrorCode {
    /// Every defined code, in numeric order
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::AccountPending,
        ErrorCode::AccountRejected,
        ErrorCode::PasswordTooShort,
        ErrorCode::PermissionDenied,
        ErrorCode::RoleRequired,
        ErrorCode::AdminRequired,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderAlreadyCompleted,
        ErrorCode::OrderCancelled,
        ErrorCode::OrderEmpty,
        ErrorCode::InvalidStatusTransition,
        ErrorCode::OrderItemsLocked,
        ErrorCode::OrderVersionConflict,
        ErrorCode::InvalidQuantity,
        ErrorCode::OrderAlreadyInStatus,
        ErrorCode::MenuItemNotFound,
        ErrorCode::MenuItemInvalidPrice,
        ErrorCode::MenuItemUnavailable,
        ErrorCode::CategoryNotFound,
        ErrorCode::CategoryHasItems,
        ErrorCode::CategoryNameExists,
        ErrorCode::CategoryHasChildren,
        ErrorCode::CategoryNestingTooDeep,
        ErrorCode::CategoryInvalidParent,
        ErrorCode::TableNotFound,
        ErrorCode::TableOccupied,
        ErrorCode::TableNumberExists,
        ErrorCode::TableHasOrders,
        ErrorCode::TableUnavailable,
        ErrorCode::InvalidTableStatusChange,
        ErrorCode::StaffNotFound,
        ErrorCode::StaffUsernameExists,
        ErrorCode::StaffCannotDeleteSelf,
        ErrorCode::LastAdmin,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::NetworkError,
        ErrorCode::TimeoutError,
        ErrorCode::ConfigError,
        ErrorCode::ClientDisconnected,
    ];

    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountPending => "Account is waiting for admin approval",
            ErrorCode::AccountRejected => "Account registration was rejected",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderCancelled => "Order has been cancelled",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderItemsLocked => "Order items can no longer be changed",
            ErrorCode::OrderVersionConflict => "Order was modified by another user",
            ErrorCode::InvalidQuantity => "Item quantity is out of range",
            ErrorCode::OrderAlreadyInStatus => "Order is already in this status",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has associated menu items",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryHasChildren => "Category has subcategories",
            ErrorCode::CategoryNestingTooDeep => "Subcategories cannot have children",
            ErrorCode::CategoryInvalidParent => "Category cannot be its own parent",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::TableHasOrders => "Table has active orders",
            ErrorCode::TableUnavailable => "Table is not accepting orders",
            ErrorCode::InvalidTableStatusChange => "Table status change is not allowed",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffUsernameExists => "Username already exists",
            ErrorCode::StaffCannotDeleteSelf => "Cannot delete own account",
            ErrorCode::LastAdmin => "The last active administrator cannot be removed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ClientDisconnected => "Client disconnected",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_sorted() {
        for pair in ErrorCode::ALL.windows(2) {
            assert!(
                pair[0].code() < pair[1].code(),
                "{:?} must come before {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::AccountPending.code(), 1008);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4010);
        assert_eq!(ErrorCode::OrderVersionConflict.code(), 4012);
        assert_eq!(ErrorCode::CategoryNestingTooDeep.code(), 6105);
        assert_eq!(ErrorCode::TableHasOrders.code(), 7004);
        assert_eq!(ErrorCode::LastAdmin.code(), 8004);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_covers_all() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(3001), Err(InvalidErrorCode(3001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderItemsLocked).unwrap();
        assert_eq!(json, "4011");

        let parsed: ErrorCode = serde_json::from_str("7003").unwrap();
        assert_eq!(parsed, ErrorCode::TableNumberExists);

        assert!(serde_json::from_str::<ErrorCode>("5001").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "3");
        assert_eq!(ErrorCode::StaffNotFound.to_string(), "8001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::AccountPending.message(),
            "Account is waiting for admin approval"
        );
    }
}
