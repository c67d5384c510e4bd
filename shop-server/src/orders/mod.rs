//! 订单模块
//!
//! - [`OrderService`] - 下单 (库存预留 + 事务持久化)、取消、签收
//! - [`status`] - 状态迁移校验
//! - [`money`] - 金额计算 (rust_decimal)
//!
//! # 订单状态
//!
//! ```text
//! placed ──► received
//!    │
//!    └─────► cancelled
//! ```

pub mod error;
pub mod money;
pub mod service;
pub mod status;

pub use error::OrderError;
pub use service::OrderService;
