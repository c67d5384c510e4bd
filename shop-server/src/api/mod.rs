//! API 路由模块
//!
//! 每个资源一个子模块：`mod.rs` 定义路由，`handler.rs` 实现处理器。
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品目录 (管理员维护)
//! - [`orders`] - 下单、订单历史、取消、签收
//! - [`customers`] - 注册、登录、两步验证、账户
//! - [`reviews`] - 商品评论
//! - [`reports`] - 客户反馈
//! - [`admin`] - 管理员查询

pub mod admin;
pub mod customers;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod reviews;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
