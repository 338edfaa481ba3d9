//! Order domain errors

use shared::ErrorCode;
use shared::order::{MoneyError, OrderStatus, TransitionError};
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Items cannot change once the order is {0}")]
    ItemsLocked(OrderStatus),

    #[error("Order was modified concurrently (expected version {expected}, actual {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Menu item is not available: {0}")]
    MenuItemUnavailable(String),

    #[error("Table {0} not found")]
    TableNotFound(i32),

    #[error("Table {0} is not accepting orders")]
    TableUnavailable(i32),

    #[error("A reason is required to cancel an order")]
    ReasonRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("{0}")]
    Validation(AppError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::NotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("id", id)
            }
            OrderError::Transition(TransitionError::SameStatus(status)) => {
                AppError::with_message(ErrorCode::OrderAlreadyInStatus, message)
                    .with_detail("status", status.as_str())
            }
            OrderError::Transition(TransitionError::Terminal(OrderStatus::Cancelled)) => {
                AppError::with_message(ErrorCode::OrderCancelled, message)
            }
            OrderError::Transition(TransitionError::Terminal(_)) => {
                AppError::with_message(ErrorCode::OrderAlreadyCompleted, message)
            }
            OrderError::Transition(TransitionError::NotAllowed { from, to }) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            OrderError::ItemsLocked(status) => {
                AppError::with_message(ErrorCode::OrderItemsLocked, message)
                    .with_detail("status", status.as_str())
            }
            OrderError::VersionConflict { expected, actual } => {
                AppError::version_conflict(expected, actual)
            }
            OrderError::Money(MoneyError::Empty) => {
                AppError::with_message(ErrorCode::OrderEmpty, message)
            }
            OrderError::Money(MoneyError::Quantity(_)) => {
                AppError::with_message(ErrorCode::InvalidQuantity, message)
            }
            OrderError::Money(MoneyError::Price(_)) => {
                AppError::with_message(ErrorCode::MenuItemInvalidPrice, message)
            }
            OrderError::Money(MoneyError::TooManyItems(_)) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message)
            }
            OrderError::MenuItemNotFound(id) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, message).with_detail("id", id)
            }
            OrderError::MenuItemUnavailable(id) => {
                AppError::with_message(ErrorCode::MenuItemUnavailable, message)
                    .with_detail("id", id)
            }
            OrderError::TableNotFound(number) => {
                AppError::with_message(ErrorCode::TableNotFound, message)
                    .with_detail("table_number", number)
            }
            OrderError::TableUnavailable(number) => {
                AppError::with_message(ErrorCode::TableUnavailable, message)
                    .with_detail("table_number", number)
            }
            OrderError::ReasonRequired => AppError::with_message(ErrorCode::RequiredField, message)
                .with_detail("field", "reason"),
            OrderError::PermissionDenied(permission) => {
                AppError::with_message(ErrorCode::PermissionDenied, message)
                    .with_detail("required_permission", permission)
            }
            OrderError::Validation(err) => err,
            OrderError::Repo(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases = [
            (
                OrderError::Transition(TransitionError::NotAllowed {
                    from: OrderStatus::Pending,
                    to: OrderStatus::Served,
                }),
                ErrorCode::InvalidStatusTransition,
            ),
            (
                OrderError::Transition(TransitionError::Terminal(OrderStatus::Cancelled)),
                ErrorCode::OrderCancelled,
            ),
            (
                OrderError::Transition(TransitionError::Terminal(OrderStatus::Completed)),
                ErrorCode::OrderAlreadyCompleted,
            ),
            (
                OrderError::Transition(TransitionError::SameStatus(OrderStatus::Ready)),
                ErrorCode::OrderAlreadyInStatus,
            ),
            (
                OrderError::ItemsLocked(OrderStatus::Billed),
                ErrorCode::OrderItemsLocked,
            ),
            (
                OrderError::VersionConflict {
                    expected: 1,
                    actual: 2,
                },
                ErrorCode::OrderVersionConflict,
            ),
            (OrderError::Money(MoneyError::Empty), ErrorCode::OrderEmpty),
            (
                OrderError::Money(MoneyError::Quantity(0)),
                ErrorCode::InvalidQuantity,
            ),
            (OrderError::TableUnavailable(4), ErrorCode::TableUnavailable),
            (OrderError::ReasonRequired, ErrorCode::RequiredField),
        ];

        for (err, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.code, code);
        }
    }

    #[test]
    fn test_conflict_status() {
        let app: AppError = OrderError::VersionConflict {
            expected: 3,
            actual: 4,
        }
        .into();
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }
}
