//! Report API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{AddReportRequest, Report, ReportPage};
use shared::response::PageQuery;

use crate::auth::{CurrentAdmin, CurrentCustomer};
use crate::core::ServerState;
use crate::db::repository::{RepoError, paginate};
use crate::utils::validation::validate_request;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /reports/reports?page=n - 全部反馈，最新在前
pub async fn list(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ReportPage>> {
    let rows = state.reports().find_all().await?;
    let (rows, pagination) = paginate(rows, query.page(), state.config.page_size);

    Ok(ApiResponse::success(ReportPage {
        reports: rows.into_iter().map(Report::from).collect(),
        total_reports: pagination.total,
        current_page: pagination.page,
        total_pages: pagination.total_pages,
    }))
}

/// POST /reports/report - 客户提交反馈
pub async fn create(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(req): Json<AddReportRequest>,
) -> AppResult<ApiResponse<()>> {
    validate_request(&req)?;
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::required("text"));
    }
    if state.customers().find_by_id(&customer.id).await?.is_none() {
        return Err(AppError::new(ErrorCode::CustomerNotFound));
    }

    let report = state.reports().create(&customer.id, text).await?;
    tracing::info!(report_id = %report.id, customer_id = %customer.id, "Report recorded");
    Ok(ApiResponse::ok("Your complain has been recorded. ThankYou!"))
}

/// PUT /reports/seen/{id} - 标记已读
pub async fn mark_seen(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.reports().mark_seen(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => AppError::new(ErrorCode::ReportNotFound),
        e => e.into(),
    })?;
    Ok(ApiResponse::ok("Report marked as seen"))
}

/// DELETE /reports/delete/{id} - 删除反馈
pub async fn delete(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    if !state.reports().delete(&id).await? {
        return Err(AppError::new(ErrorCode::ReportNotFound));
    }
    Ok(ApiResponse::ok("Customer report deleted"))
}
