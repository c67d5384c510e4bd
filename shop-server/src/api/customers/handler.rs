//! Customer API Handlers
//!
//! Registration and login both run through one-time codes delivered by the
//! configured [`Mailer`](crate::services::Mailer).

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    CustomerProfile, DeleteAccountRequest, LoginRequest, LoginResponse, RegisterRequest,
    TwoStepRequest, TwoStepState, VerifyLoginRequest,
};
use validator::ValidateEmail;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{CodePurpose, CurrentCustomer, TokenKind};
use crate::core::ServerState;
use crate::db::models::{CustomerCreate, CustomerRow};
use crate::security_log;
use crate::utils::time::parse_birth_date;
use crate::utils::validation::validate_request;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Look up the account and check its password
///
/// Unknown email and wrong password produce the same error.
async fn authenticate(state: &ServerState, email: &str, password: &str) -> AppResult<CustomerRow> {
    let Some(customer) = state.customers().find_by_email(email).await? else {
        security_log!("WARN", "login_failed", email = email.to_string(), reason = "unknown_email");
        return Err(AppError::invalid_credentials());
    };

    let valid = verify_password(password, &customer.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        security_log!("WARN", "login_failed", email = email.to_string(), reason = "bad_password");
        return Err(AppError::invalid_credentials());
    }

    Ok(customer)
}

/// Token matching the account type
fn issue_token(state: &ServerState, customer: &CustomerRow) -> AppResult<LoginResponse> {
    if customer.is_admin {
        let token = state.jwt_service.generate_token(&customer.id, TokenKind::Admin)?;
        security_log!("INFO", "admin_login", admin_id = customer.id.clone());
        return Ok(LoginResponse {
            admin_token: Some(token),
            ..Default::default()
        });
    }

    let token = state
        .jwt_service
        .generate_token(&customer.id, TokenKind::Customer)?;
    Ok(LoginResponse {
        auth_token: Some(token),
        ..Default::default()
    })
}

async fn send_code(state: &ServerState, purpose: CodePurpose, email: &str) -> AppResult<()> {
    let code = state.verification_codes.issue(purpose, email);
    state.mailer.send_verification_code(email, &code).await?;
    tracing::info!(purpose = %purpose, email = %email, "Verification code sent");
    Ok(())
}

async fn require_customer(state: &ServerState, id: &str) -> AppResult<CustomerRow> {
    state
        .customers()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
}

/// GET /customer/getmail/{email} - 发送注册验证码
pub async fn request_code(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::validation("Enter a valid email").with_detail("field", "email"));
    }
    if state.customers().find_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists));
    }

    send_code(&state, CodePurpose::Registration, &email).await?;
    Ok(ApiResponse::ok("Verification code sent"))
}

/// POST /customer/register - 注册
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    validate_request(&req)?;
    parse_birth_date(&req.date_of_birth)?;
    let email = req.email.trim().to_lowercase();

    state
        .verification_codes
        .verify(CodePurpose::Registration, &email, &req.code)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let customer = state
        .customers()
        .create(CustomerCreate {
            name: req.name.trim().to_string(),
            date_of_birth: req.date_of_birth.trim().to_string(),
            email,
            password_hash,
            is_admin: false,
        })
        .await
        .map_err(|e| match AppError::from(e) {
            err if err.code == ErrorCode::AlreadyExists => AppError::new(ErrorCode::EmailExists),
            err => err,
        })?;

    tracing::info!(customer_id = %customer.id, "Customer registered");
    Ok(ApiResponse::success(issue_token(&state, &customer)?))
}

/// POST /customer/login - 登录
///
/// 开启两步验证的客户不会直接拿到令牌，而是收到一封验证码邮件。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    validate_request(&req)?;
    let customer = authenticate(&state, &req.email, &req.password).await?;

    if customer.two_step_auth && !customer.is_admin {
        send_code(&state, CodePurpose::Login, &customer.email).await?;
        return Ok(ApiResponse::success_with_message(
            "Verification code sent",
            LoginResponse {
                two_step: true,
                ..Default::default()
            },
        ));
    }

    Ok(ApiResponse::success(issue_token(&state, &customer)?))
}

/// POST /customer/verifylogin - 两步验证第二步
pub async fn verify_login(
    State(state): State<ServerState>,
    Json(req): Json<VerifyLoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    validate_request(&req)?;
    let customer = authenticate(&state, &req.email, &req.password).await?;

    state
        .verification_codes
        .verify(CodePurpose::Login, &customer.email, &req.code)
        .inspect_err(|e| {
            security_log!(
                "WARN",
                "two_step_failed",
                customer_id = customer.id.clone(),
                error = e.to_string()
            );
        })?;

    Ok(ApiResponse::success(issue_token(&state, &customer)?))
}

/// GET /customer/getcustomer - 当前客户资料
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentCustomer,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let customer = require_customer(&state, &current.id).await?;
    Ok(ApiResponse::success(CustomerProfile {
        customer: customer.into(),
    }))
}

/// PUT /customer/twostep - 开关两步验证
pub async fn set_two_step(
    State(state): State<ServerState>,
    current: CurrentCustomer,
    Json(req): Json<TwoStepRequest>,
) -> AppResult<ApiResponse<TwoStepState>> {
    require_customer(&state, &current.id).await?;
    let customer = state.customers().set_two_step(&current.id, req.enabled).await?;

    Ok(ApiResponse::success(TwoStepState {
        two_step_auth: customer.two_step_auth,
    }))
}

/// DELETE /customer/delete - 注销账户
///
/// 需要再次提供邮箱和密码；仍有未完成订单时拒绝。评论和反馈一并删除，订单保留。
pub async fn delete_account(
    State(state): State<ServerState>,
    current: CurrentCustomer,
    Json(req): Json<DeleteAccountRequest>,
) -> AppResult<ApiResponse<()>> {
    validate_request(&req)?;
    let customer = require_customer(&state, &current.id).await?;

    if customer.email != req.email.trim().to_lowercase() {
        security_log!("WARN", "delete_failed", customer_id = customer.id.clone(), reason = "email_mismatch");
        return Err(AppError::invalid_credentials());
    }
    let valid = verify_password(&req.password, &customer.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        security_log!("WARN", "delete_failed", customer_id = customer.id.clone(), reason = "bad_password");
        return Err(AppError::invalid_credentials());
    }
    if customer.is_admin {
        return Err(AppError::permission_denied("The admin account cannot be deleted"));
    }

    state.orders.delete_customer(&customer.id).await?;
    Ok(ApiResponse::ok("Account Deleted"))
}
