//! Handler functions for sale API endpoints.

use crate::api::common::{ApiResponse, ListFilter, PaginationMeta, service_error_to_http};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{CreateSale, Sale, SaleStatus, SaleWithItems};
use crate::services::sale_service::SaleService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Records a checkout, deducting stock and settling payment atomically.
///
/// Replaying the same `client_reference` returns the original sale.
#[axum::debug_handler]
pub async fn create_sale(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<CreateSale>,
) -> Result<ResponseJson<ApiResponse<SaleWithItems>>, (StatusCode, String)> {
    let service = SaleService::new(&pool);
    match service.create_sale(payload, &principal.user_id).await {
        Ok(sale) => Ok(ResponseJson(ApiResponse::success(
            sale,
            "Sale recorded successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a sale with its line items.
#[axum::debug_handler]
pub async fn get_sale(
    Extension(pool): Extension<SqlitePool>,
    Path(sale_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<SaleWithItems>>, (StatusCode, String)> {
    let service = SaleService::new(&pool);
    match service.get_sale_required(&sale_id).await {
        Ok(sale) => Ok(ResponseJson(ApiResponse::success(
            sale,
            "Sale retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists sales, optionally filtered by status and date range.
#[axum::debug_handler]
pub async fn list_sales(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<ListFilter<SaleStatus>>,
) -> Result<ResponseJson<ApiResponse<Vec<Sale>>>, (StatusCode, String)> {
    let service = SaleService::new(&pool);
    match service.list_sales(&filter).await {
        Ok(sales) => Ok(ResponseJson(ApiResponse::paginated(
            sales.items,
            PaginationMeta::from_filter(&filter.pagination(), sales.total),
            "Sales retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Voids a completed sale, restocking its items and reversing any
/// credit charge.
#[axum::debug_handler]
pub async fn void_sale(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(sale_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<SaleWithItems>>, (StatusCode, String)> {
    let service = SaleService::new(&pool);
    match service.void_sale(&sale_id, &principal.user_id).await {
        Ok(sale) => Ok(ResponseJson(ApiResponse::success(
            sale,
            "Sale voided successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
