//! Product API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /products/all | GET | 商品列表 | 无 |
//! | /products/details/{id} | GET | 商品详情 | 无 |
//! | /products/add | POST | 新建商品 (multipart) | 管理员 |
//! | /products/update/{id} | PUT | 更新商品 (multipart) | 管理员 |
//! | /products/delete/{id} | DELETE | 删除商品 (无未完成订单) | 管理员 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/all", get(handler::list))
        .route("/details/{id}", get(handler::get_by_id))
        .route("/add", post(handler::create))
        .route("/update/{id}", put(handler::update))
        .route("/delete/{id}", delete(handler::delete))
}
