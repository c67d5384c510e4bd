//! Review API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /reviews/reviews/{product_id} | GET | 商品评论 (分页) | 无 |
//! | /reviews/review/{product_id} | POST | 发表评论 | 客户 |
//! | /reviews/myreviews | GET | 我的评论 (分页) | 客户 |
//! | /reviews/review/{id} | DELETE | 删除评论 | 作者本人 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/reviews", review_routes())
}

fn review_routes() -> Router<ServerState> {
    Router::new()
        .route("/reviews/{product_id}", get(handler::list_for_product))
        .route("/myreviews", get(handler::list_mine))
        // POST takes a product id, DELETE a review id
        .route("/review/{id}", post(handler::create).delete(handler::delete))
}
