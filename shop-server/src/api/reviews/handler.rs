//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{AddReviewRequest, Review, ReviewCreated, ReviewPage};
use shared::response::PageQuery;

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::db::models::ReviewRow;
use crate::db::repository::paginate;
use crate::utils::validation::validate_request;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn review_page(rows: Vec<ReviewRow>, page: u32, per_page: u32) -> ReviewPage {
    let (rows, pagination) = paginate(rows, page, per_page);
    ReviewPage {
        reviews: rows.into_iter().map(Review::from).collect(),
        total_reviews: pagination.total,
        current_page: pagination.page,
        total_pages: pagination.total_pages,
    }
}

/// GET /reviews/reviews/{product_id}?page=n - 商品评论，最新在前
pub async fn list_for_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ReviewPage>> {
    if state.products().find_by_id(&product_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::ProductNotFound).with_detail("productId", product_id));
    }

    let rows = state.reviews().find_by_product(&product_id).await?;
    Ok(ApiResponse::success(review_page(
        rows,
        query.page(),
        state.config.page_size,
    )))
}

/// GET /reviews/myreviews?page=n - 当前客户的评论
pub async fn list_mine(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ReviewPage>> {
    let rows = state.reviews().find_by_customer(&customer.id).await?;
    Ok(ApiResponse::success(review_page(
        rows,
        query.page(),
        state.config.page_size,
    )))
}

/// POST /reviews/review/{product_id} - 发表评论
pub async fn create(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(product_id): Path<String>,
    Json(req): Json<AddReviewRequest>,
) -> AppResult<ApiResponse<ReviewCreated>> {
    validate_request(&req)?;
    let comment = req.comment.trim().to_string();
    if comment.is_empty() {
        return Err(AppError::required("comment"));
    }

    if state.customers().find_by_id(&customer.id).await?.is_none() {
        return Err(AppError::new(ErrorCode::CustomerNotFound));
    }
    if state.products().find_by_id(&product_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::ProductNotFound).with_detail("productId", product_id));
    }

    let review = state
        .reviews()
        .create(&customer.id, &product_id, comment)
        .await?;

    tracing::info!(review_id = %review.id, product_id = %product_id, "Review added");
    Ok(ApiResponse::success_with_message(
        "Review added",
        ReviewCreated {
            review: review.into(),
        },
    ))
}

/// DELETE /reviews/review/{id} - 作者删除自己的评论
pub async fn delete(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let reviews = state.reviews();
    let review = reviews
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound))?;

    if review.customer_id != customer.id {
        return Err(AppError::with_message(
            ErrorCode::NotResourceOwner,
            "Not authorized to delete this review",
        ));
    }

    reviews.delete(&id).await?;
    Ok(ApiResponse::ok("Review deleted"))
}
