//! Token Extractors
//!
//! - [`CurrentCustomer`] - `auth-token` header, customer token
//! - [`CurrentAdmin`] - `admin-token` header, admin token, cross-checked
//!   against the stored admin account
//! - [`Caller`] - either of the above (owner-or-admin routes)

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Claims, TokenKind};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Customer token header
pub const AUTH_TOKEN_HEADER: &str = "auth-token";
/// Admin token header
pub const ADMIN_TOKEN_HEADER: &str = "admin-token";

/// Authenticated customer
#[derive(Debug, Clone)]
pub struct CurrentCustomer {
    pub id: String,
}

/// Authenticated admin
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: String,
}

/// Authenticated customer or admin
#[derive(Debug, Clone)]
pub enum Caller {
    Customer(CurrentCustomer),
    Admin(CurrentAdmin),
}

impl Caller {
    pub fn id(&self) -> &str {
        match self {
            Caller::Customer(c) => &c.id,
            Caller::Admin(a) => &a.id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::Admin(_))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Validate a token of the expected kind, logging failures
fn verify(
    parts: &Parts,
    state: &ServerState,
    token: &str,
    kind: TokenKind,
) -> Result<Claims, AppError> {
    state
        .jwt_service
        .validate_kind(token, kind)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                kind = format!("{}", kind),
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            AppError::from(e)
        })
}

impl FromRequestParts<ServerState> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(customer) = parts.extensions.get::<CurrentCustomer>() {
            return Ok(customer.clone());
        }

        let Some(token) = header(parts, AUTH_TOKEN_HEADER) else {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::not_authenticated());
        };

        let claims = verify(parts, state, token, TokenKind::Customer)?;
        let customer = CurrentCustomer { id: claims.sub };
        parts.extensions.insert(customer.clone());
        Ok(customer)
    }
}

impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(admin.clone());
        }

        let Some(token) = header(parts, ADMIN_TOKEN_HEADER) else {
            security_log!("WARN", "admin_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::not_authenticated());
        };

        let claims = verify(parts, state, token, TokenKind::Admin)?;

        // The claim must name the one stored admin account
        let stored = state.customers().find_by_id(&claims.sub).await?;
        if !stored.is_some_and(|c| c.is_admin) {
            security_log!(
                "WARN",
                "admin_mismatch",
                subject = claims.sub.clone(),
                uri = format!("{:?}", parts.uri)
            );
            return Err(AppError::new(ErrorCode::AdminRequired));
        }

        let admin = CurrentAdmin { id: claims.sub };
        parts.extensions.insert(admin.clone());
        Ok(admin)
    }
}

impl FromRequestParts<ServerState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if header(parts, ADMIN_TOKEN_HEADER).is_some() {
            CurrentAdmin::from_request_parts(parts, state)
                .await
                .map(Caller::Admin)
        } else {
            CurrentCustomer::from_request_parts(parts, state)
                .await
                .map(Caller::Customer)
        }
    }
}
