//! Utilities shared by every layer: error re-exports, logging, time and input checks

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
