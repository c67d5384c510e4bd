//! Customer Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer profile (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub is_admin: bool,
    pub two_step_auth: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 5, message = "Name must be at least 5 characters"))]
    pub name: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date_of_birth: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 16, message = "Password must be 8 to 16 characters"))]
    pub password: String,
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyLoginRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwoStepRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login outcome: exactly one of the tokens, or `twoStep = true`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    pub two_step: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub customer: Customer,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoStepState {
    pub two_step_auth: bool,
}
