//! Handler functions for purchase order API endpoints.

use crate::api::common::{ApiResponse, ListFilter, PaginationMeta, service_error_to_http};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{
    CreatePurchaseOrder, PurchaseOrder, PurchaseOrderStatus, PurchaseOrderWithItems,
    ReceivePurchaseOrder,
};
use crate::services::purchase_order_service::PurchaseOrderService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Creates a draft purchase order against a supplier.
#[axum::debug_handler]
pub async fn create_purchase_order(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<CreatePurchaseOrder>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrderWithItems>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service.create_order(payload, &principal.user_id).await {
        Ok(order) => Ok(ResponseJson(ApiResponse::success(
            order,
            "Purchase order created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a purchase order with its line items.
#[axum::debug_handler]
pub async fn get_purchase_order(
    Extension(pool): Extension<SqlitePool>,
    Path(order_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrderWithItems>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service.get_order_required(&order_id).await {
        Ok(order) => Ok(ResponseJson(ApiResponse::success(
            order,
            "Purchase order retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists purchase orders, optionally filtered by status and date range.
#[axum::debug_handler]
pub async fn list_purchase_orders(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<ListFilter<PurchaseOrderStatus>>,
) -> Result<ResponseJson<ApiResponse<Vec<PurchaseOrder>>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service.list_orders(&filter).await {
        Ok(orders) => Ok(ResponseJson(ApiResponse::paginated(
            orders.items,
            PaginationMeta::from_filter(&filter.pagination(), orders.total),
            "Purchase orders retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Submits a draft order to its supplier.
#[axum::debug_handler]
pub async fn submit_purchase_order(
    Extension(pool): Extension<SqlitePool>,
    Path(order_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrderWithItems>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service.submit_order(&order_id).await {
        Ok(order) => Ok(ResponseJson(ApiResponse::success(
            order,
            "Purchase order submitted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Receives a submitted order into stock.
#[axum::debug_handler]
pub async fn receive_purchase_order(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(order_id): Path<String>,
    Json(payload): Json<ReceivePurchaseOrder>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrderWithItems>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service
        .receive_order(&order_id, payload, &principal.user_id)
        .await
    {
        Ok(order) => Ok(ResponseJson(ApiResponse::success(
            order,
            "Purchase order received successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Cancels an order that has not been received.
#[axum::debug_handler]
pub async fn cancel_purchase_order(
    Extension(pool): Extension<SqlitePool>,
    Path(order_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrderWithItems>>, (StatusCode, String)> {
    let service = PurchaseOrderService::new(&pool);
    match service.cancel_order(&order_id).await {
        Ok(order) => Ok(ResponseJson(ApiResponse::success(
            order,
            "Purchase order cancelled successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
