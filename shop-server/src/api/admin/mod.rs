//! Admin API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /admin/getadmin | GET | 管理员资料 |
//! | /admin/customers | GET | 全部客户 (不含管理员) |
//! | /admin/getorders | POST | 指定客户的订单 |
//!
//! 全部需要 `admin-token`。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/getadmin", get(handler::profile))
        .route("/customers", get(handler::customers))
        .route("/getorders", post(handler::customer_orders))
}
