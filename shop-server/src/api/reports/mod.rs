//! Report API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /reports/reports | GET | 反馈列表 (分页) | 管理员 |
//! | /reports/report | POST | 提交反馈 | 客户 |
//! | /reports/seen/{id} | PUT | 标记已读 | 管理员 |
//! | /reports/delete/{id} | DELETE | 删除反馈 | 管理员 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/reports", report_routes())
}

fn report_routes() -> Router<ServerState> {
    Router::new()
        .route("/reports", get(handler::list))
        .route("/report", post(handler::create))
        .route("/seen/{id}", put(handler::mark_seen))
        .route("/delete/{id}", delete(handler::delete))
}
