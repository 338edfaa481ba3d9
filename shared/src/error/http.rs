//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound
            | Self::StaffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict: the request is well-formed but clashes with current state
            Self::AlreadyExists
            | Self::OrderAlreadyCompleted
            | Self::OrderCancelled
            | Self::OrderAlreadyInStatus
            | Self::InvalidStatusTransition
            | Self::OrderItemsLocked
            | Self::OrderVersionConflict
            | Self::MenuItemUnavailable
            | Self::CategoryNameExists
            | Self::CategoryHasItems
            | Self::CategoryHasChildren
            | Self::TableOccupied
            | Self::TableNumberExists
            | Self::TableHasOrders
            | Self::TableUnavailable
            | Self::InvalidTableStatusChange
            | Self::StaffUsernameExists
            | Self::LastAdmin => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired
            | Self::AccountPending
            | Self::AccountRejected
            | Self::StaffCannotDeleteSelf => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ClientDisconnected => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::PasswordTooShort
            | Self::OrderEmpty
            | Self::InvalidQuantity
            | Self::MenuItemInvalidPrice
            | Self::CategoryNestingTooDeep
            | Self::CategoryInvalidParent => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::OrderNotFound,
            ErrorCode::MenuItemNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::StaffNotFound,
        ] {
            assert_eq!(code.http_status(), StatusCode::NOT_FOUND, "{code:?}");
        }
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::OrderVersionConflict.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::TableHasOrders.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::LastAdmin.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AccountPending.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_bad_request_and_system_status() {
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::CategoryNestingTooDeep.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
