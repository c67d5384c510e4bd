//! Shop Server - 电商后端 (订单履约与库存一致性)
//!
//! # 架构概述
//!
//! - **库存台账** (`inventory`): 每个商品的可售/预留数量，reserve / release / finalize
//! - **订单** (`orders`): 下单、取消、签收，以及对应的库存补偿
//! - **认证** (`auth`): JWT + Argon2，客户令牌与管理员令牌，两步登录验证码
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT、提取器、密码、验证码
//! ├── db/            # 数据库连接、模型、仓储
//! ├── inventory/     # 库存台账
//! ├── orders/        # 订单服务与状态机
//! ├── services/      # 邮件、图片存储
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{Caller, CurrentAdmin, CurrentCustomer, JwtService};
pub use core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 `.env`，创建工作目录，初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    let log_dir = config
        .log_to_file
        .then(|| log_dir.to_string_lossy().into_owned());
    init_logger_with_file(&config.log_level, config.log_json, log_dir.as_deref())?;

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
