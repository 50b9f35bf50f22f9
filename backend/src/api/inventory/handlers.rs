//! Handler functions for inventory API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{StockAdjustment, StockLevel, StockLevelWithProduct, StockMovement};
use crate::services::inventory_service::InventoryService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Retrieves the stock level of one product in one branch.
#[axum::debug_handler]
pub async fn get_stock_level(
    Extension(pool): Extension<SqlitePool>,
    Path((branch_id, product_id)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<StockLevel>>, (StatusCode, String)> {
    let service = InventoryService::new(&pool);
    match service.get_stock_level(&branch_id, &product_id).await {
        Ok(level) => Ok(ResponseJson(ApiResponse::success(
            level,
            "Stock level retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists all stock in a branch with product details.
#[axum::debug_handler]
pub async fn list_branch_stock(
    Extension(pool): Extension<SqlitePool>,
    Path(branch_id): Path<String>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<StockLevelWithProduct>>>, (StatusCode, String)> {
    let service = InventoryService::new(&pool);
    match service.list_branch_stock(&branch_id, &pagination).await {
        Ok(stock) => Ok(ResponseJson(ApiResponse::paginated(
            stock.items,
            PaginationMeta::from_filter(&pagination, stock.total),
            "Branch stock retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists active products at or below their reorder level.
#[axum::debug_handler]
pub async fn list_low_stock(
    Extension(pool): Extension<SqlitePool>,
    Path(branch_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<StockLevelWithProduct>>>, (StatusCode, String)> {
    let service = InventoryService::new(&pool);
    match service.list_low_stock(&branch_id).await {
        Ok(low) => Ok(ResponseJson(ApiResponse::success(
            low,
            "Low stock retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists the movement ledger of a branch, newest first.
#[axum::debug_handler]
pub async fn list_movements(
    Extension(pool): Extension<SqlitePool>,
    Path(branch_id): Path<String>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<StockMovement>>>, (StatusCode, String)> {
    let service = InventoryService::new(&pool);
    match service.list_movements(&branch_id, &pagination).await {
        Ok(movements) => Ok(ResponseJson(ApiResponse::paginated(
            movements.items,
            PaginationMeta::from_filter(&pagination, movements.total),
            "Stock movements retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Manually adjusts stock, recording the reason in the ledger.
#[axum::debug_handler]
pub async fn adjust_stock(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<StockAdjustment>,
) -> Result<ResponseJson<ApiResponse<StockLevel>>, (StatusCode, String)> {
    let service = InventoryService::new(&pool);
    match service.adjust_stock(payload, &principal.user_id).await {
        Ok(level) => Ok(ResponseJson(ApiResponse::success(
            level,
            "Stock adjusted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
