use axum::{Json, extract::State};
use shared::models::{Customer, CustomerList, CustomerProfile, IdRequest, OrderList};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /admin/getadmin
pub async fn profile(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let admin = state
        .customers()
        .find_by_id(&admin.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminRequired))?;

    Ok(ApiResponse::success(CustomerProfile {
        customer: admin.into(),
    }))
}

/// GET /admin/customers
pub async fn customers(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
) -> AppResult<ApiResponse<CustomerList>> {
    let customers = state.customers().find_all_customers().await?;
    Ok(ApiResponse::success_with_message(
        "All Customers Fetched",
        CustomerList {
            customers: customers.into_iter().map(Customer::from).collect(),
        },
    ))
}

/// POST /admin/getorders - 指定客户的全部订单，最新在前
pub async fn customer_orders(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(req): Json<IdRequest>,
) -> AppResult<ApiResponse<OrderList>> {
    if state.customers().find_by_id(&req.id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::CustomerNotFound,
            "There is no user to fetch orders",
        ));
    }

    let orders = state.orders.list_all_for_customer(&req.id).await?;
    Ok(ApiResponse::success_with_message(
        "Orders Fetched",
        OrderList { orders },
    ))
}
