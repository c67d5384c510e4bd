//! Customer API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /customer/getmail/{email} | GET | 发送注册验证码 | 无 |
//! | /customer/register | POST | 使用验证码注册 | 无 |
//! | /customer/login | POST | 登录 / 开始两步验证 | 无 |
//! | /customer/verifylogin | POST | 完成两步验证 | 无 |
//! | /customer/getcustomer | GET | 当前客户资料 | 客户 |
//! | /customer/twostep | PUT | 开关两步验证 | 客户 |
//! | /customer/delete | DELETE | 注销账户 | 客户 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/customer", customer_routes())
}

fn customer_routes() -> Router<ServerState> {
    Router::new()
        // Public routes
        .route("/getmail/{email}", get(handler::request_code))
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/verifylogin", post(handler::verify_login))
        // Customer token required
        .route("/getcustomer", get(handler::profile))
        .route("/twostep", put(handler::set_two_step))
        .route("/delete", delete(handler::delete_account))
}
