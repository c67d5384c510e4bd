//! Order API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /orders/make | POST | 下单 | 客户 |
//! | /orders/get | GET | 订单历史 (分页, 最新在前) | 客户 |
//! | /orders/delete/{id} | DELETE | 取消订单 | 订单所属客户或管理员 |
//! | /orders/received | POST | 确认签收 | 管理员 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/make", post(handler::place))
        .route("/get", get(handler::list_mine))
        .route("/delete/{id}", delete(handler::cancel))
        .route("/received", post(handler::received))
}
