//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务 (客户令牌 / 管理员令牌)
//! - [`CurrentCustomer`] / [`CurrentAdmin`] / [`Caller`] - 请求提取器
//! - [`password`] - Argon2 密码哈希
//! - [`VerificationCodes`] - 注册与两步登录验证码

pub mod extractor;
pub mod jwt;
pub mod password;
pub mod verification;

pub use extractor::{ADMIN_TOKEN_HEADER, AUTH_TOKEN_HEADER, Caller, CurrentAdmin, CurrentCustomer};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TokenKind};
pub use verification::{CodePurpose, VerificationCodes, VerificationError};
