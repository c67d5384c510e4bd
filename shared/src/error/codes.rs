//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer errors
//! - 4xxx: Order errors
//! - 5xxx: Inventory errors
//! - 6xxx: Product errors (65xx: image upload)
//! - 7xxx: Review and report errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the web client.
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

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Verification code expired
    VerificationCodeExpired = 1005,
    /// Verification code invalid
    VerificationCodeInvalid = 1006,
    /// Too many verification attempts
    TooManyAttempts = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Caller does not own the resource
    NotResourceOwner = 2003,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Email already registered
    EmailExists = 3002,
    /// Customer still has placed orders
    CustomerHasOpenOrders = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order contains no lines
    EmptyOrder = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Order has already been received
    OrderAlreadyReceived = 4004,
    /// Stored line items disagree with the order header
    OrderLinesInconsistent = 4005,

    // ==================== 5xxx: Inventory ====================
    /// Not enough available stock
    InsufficientStock = 5001,
    /// Quantity must be positive
    InvalidQuantity = 5002,
    /// Reserved quantity is lower than the amount being released or finalized
    ReservationMismatch = 5003,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product name already exists
    ProductNameExists = 6003,
    /// Product is referenced by placed orders
    ProductHasOpenOrders = 6004,

    // ==================== 65xx: Image Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported image type
    UnsupportedImageType = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,

    // ==================== 7xxx: Review / Report ====================
    /// Review not found
    ReviewNotFound = 7001,
    /// Report not found
    ReportNotFound = 7101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Verification mail could not be delivered
    MailDeliveryFailed = 9004,
    /// File storage failed
    StorageError = 9005,
}

impl ErrorCode {
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

    /// Get the developer-facing English message for this error code
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

            // Auth
            ErrorCode::NotAuthenticated => "Please authenticate using a valid token",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Please authenticate using a valid token",
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::VerificationCodeInvalid => "Enter the correct code",
            ErrorCode::TooManyAttempts => "Too many attempts",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Authorization failed",
            ErrorCode::NotResourceOwner => "Not authorized for this resource",

            // Customer
            ErrorCode::CustomerNotFound => "No such customer found",
            ErrorCode::EmailExists => "A customer already registered with this email",
            ErrorCode::CustomerHasOpenOrders => "Customer still has orders in progress",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::EmptyOrder => "Please select some items first",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderAlreadyReceived => "Order has already been received",
            ErrorCode::OrderLinesInconsistent => "Order line items are inconsistent",

            // Inventory
            ErrorCode::InsufficientStock => {
                "One of the products is asked in more quantity than the supply"
            }
            ErrorCode::InvalidQuantity => "Product quantity should not be zero",
            ErrorCode::ReservationMismatch => "Reserved stock does not cover the requested quantity",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductNameExists => "Product name already exists",
            ErrorCode::ProductHasOpenOrders => {
                "Cannot delete the product as there are orders of it made"
            }

            // Image upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedImageType => "File type provided is not acceptable",
            ErrorCode::InvalidImageFile => "Invalid image file",

            // Review / Report
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::ReportNotFound => "Report not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailDeliveryFailed => "Verification mail could not be sent",
            ErrorCode::StorageError => "File storage failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
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
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::VerificationCodeExpired),
            1006 => Ok(ErrorCode::VerificationCodeInvalid),
            1007 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::NotResourceOwner),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::CustomerHasOpenOrders),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::EmptyOrder),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4004 => Ok(ErrorCode::OrderAlreadyReceived),
            4005 => Ok(ErrorCode::OrderLinesInconsistent),

            // Inventory
            5001 => Ok(ErrorCode::InsufficientStock),
            5002 => Ok(ErrorCode::InvalidQuantity),
            5003 => Ok(ErrorCode::ReservationMismatch),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductNameExists),
            6004 => Ok(ErrorCode::ProductHasOpenOrders),
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedImageType),
            6503 => Ok(ErrorCode::InvalidImageFile),

            // Review / Report
            7001 => Ok(ErrorCode::ReviewNotFound),
            7101 => Ok(ErrorCode::ReportNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::MailDeliveryFailed),
            9005 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InsufficientStock.code(), 5001);
        assert_eq!(ErrorCode::ProductHasOpenOrders.code(), 6004);
    }

    #[test]
    fn test_try_from_round_trip_for_domain_codes() {
        for code in [
            ErrorCode::EmptyOrder,
            ErrorCode::InsufficientStock,
            ErrorCode::InvalidQuantity,
            ErrorCode::OrderAlreadyCancelled,
            ErrorCode::ProductHasOpenOrders,
            ErrorCode::AdminRequired,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "5001");
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::OrderAlreadyCancelled);
    }
}
