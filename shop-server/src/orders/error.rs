//! Order errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::inventory::LedgerError;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Please select some items first")]
    EmptyOrder,

    #[error("Customer {0} not found")]
    UnknownCustomer(String),

    /// A line failed to reserve; `index` is the 0-based position in the request
    #[error("Line {index}: {source}")]
    Line {
        index: usize,
        #[source]
        source: LedgerError,
    },

    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Order {0} does not belong to the caller")]
    NotOwner(String),

    #[error("Order {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("Order {0} is already received")]
    AlreadyReceived(String),

    #[error("Customer {0} still has placed orders")]
    CustomerHasOpenOrders(String),

    #[error("Order {0} changed concurrently")]
    Conflict(String),

    #[error("Order {order_id} lists {expected} lines but {found} are stored")]
    LinesInconsistent {
        order_id: String,
        expected: i64,
        found: usize,
    },

    /// Some compensating ledger updates failed after the status changed
    #[error("Order {order_id}: stock could not be settled for lines {failed_lines:?}")]
    SettlementIncomplete {
        order_id: String,
        failed_lines: Vec<usize>,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder => AppError::new(ErrorCode::EmptyOrder),
            OrderError::UnknownCustomer(_) => AppError::with_message(
                ErrorCode::PermissionDenied,
                "Not Authorized for making the request",
            ),
            OrderError::Line { index, source } => {
                AppError::from(source).with_detail("line", index)
            }
            OrderError::NotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
            }
            err @ OrderError::NotOwner(_) => {
                AppError::with_message(ErrorCode::NotResourceOwner, err.to_string())
            }
            err @ OrderError::AlreadyCancelled(_) => {
                AppError::with_message(ErrorCode::OrderAlreadyCancelled, err.to_string())
            }
            err @ OrderError::AlreadyReceived(_) => {
                AppError::with_message(ErrorCode::OrderAlreadyReceived, err.to_string())
            }
            OrderError::CustomerHasOpenOrders(_) => AppError::new(ErrorCode::CustomerHasOpenOrders),
            err @ OrderError::Conflict(_) => AppError::conflict(err.to_string()),
            err @ OrderError::LinesInconsistent { .. } => {
                AppError::with_message(ErrorCode::OrderLinesInconsistent, err.to_string())
            }
            OrderError::SettlementIncomplete {
                order_id,
                failed_lines,
            } => AppError::internal(format!(
                "Order {} changed status but stock could not be settled for every line",
                order_id
            ))
            .with_detail("orderId", order_id)
            .with_detail("failedLines", failed_lines),
            OrderError::Ledger(e) => e.into(),
            OrderError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_keeps_ledger_code() {
        let err: AppError = OrderError::Line {
            index: 1,
            source: LedgerError::InsufficientStock {
                product_id: "p1".into(),
                requested: 6,
                available: 4,
            },
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        let details = err.details.unwrap();
        assert_eq!(details["line"], 1);
        assert_eq!(details["available"], 4);
    }

    #[test]
    fn test_terminal_states_are_conflicts() {
        let err: AppError = OrderError::AlreadyCancelled("o1".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        let err: AppError = OrderError::CustomerHasOpenOrders("c1".into()).into();
        assert_eq!(err.code, ErrorCode::CustomerHasOpenOrders);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        let err: AppError = OrderError::EmptyOrder.into();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
