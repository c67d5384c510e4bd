//! Ledger errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Product quantity should not be zero")]
    InvalidQuantity { quantity: i64 },

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Reservation mismatch for product {product_id}: requested {requested}, reserved {reserved}")]
    ReservationMismatch {
        product_id: String,
        requested: i64,
        reserved: i64,
    },

    #[error("Cannot delete the product as there are orders of it made")]
    HasOpenOrders { product_id: String, open_lines: u64 },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidQuantity { quantity } => {
                AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", quantity)
            }
            LedgerError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
                    .with_detail("productId", id)
            }
            LedgerError::InsufficientStock {
                product_id,
                requested,
                available,
            } => AppError::new(ErrorCode::InsufficientStock)
                .with_detail("productId", product_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            err @ LedgerError::ReservationMismatch { .. } => {
                AppError::with_message(ErrorCode::ReservationMismatch, err.to_string())
            }
            LedgerError::HasOpenOrders {
                product_id,
                open_lines,
            } => AppError::new(ErrorCode::ProductHasOpenOrders)
                .with_detail("productId", product_id)
                .with_detail("openLines", open_lines),
            LedgerError::Repo(e) => e.into(),
        }
    }
}
