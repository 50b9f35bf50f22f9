//! Handler functions for supplier API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateSupplier, Supplier, UpdateSupplier};
use crate::services::supplier_service::SupplierService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Registers a new supplier.
#[axum::debug_handler]
pub async fn create_supplier(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateSupplier>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, (StatusCode, String)> {
    let service = SupplierService::new(&pool);
    match service.create_supplier(payload).await {
        Ok(supplier) => Ok(ResponseJson(ApiResponse::success(
            supplier,
            "Supplier created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a supplier by id.
#[axum::debug_handler]
pub async fn get_supplier(
    Extension(pool): Extension<SqlitePool>,
    Path(supplier_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, (StatusCode, String)> {
    let service = SupplierService::new(&pool);
    match service.get_supplier_required(&supplier_id).await {
        Ok(supplier) => Ok(ResponseJson(ApiResponse::success(
            supplier,
            "Supplier retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists suppliers for the tenant, newest first.
#[axum::debug_handler]
pub async fn list_suppliers(
    Extension(pool): Extension<SqlitePool>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Supplier>>>, (StatusCode, String)> {
    let service = SupplierService::new(&pool);
    match service.list_suppliers(&pagination).await {
        Ok(suppliers) => Ok(ResponseJson(ApiResponse::paginated(
            suppliers.items,
            PaginationMeta::from_filter(&pagination, suppliers.total),
            "Suppliers retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates supplier contact details.
#[axum::debug_handler]
pub async fn update_supplier(
    Extension(pool): Extension<SqlitePool>,
    Path(supplier_id): Path<String>,
    Json(payload): Json<UpdateSupplier>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, (StatusCode, String)> {
    let service = SupplierService::new(&pool);
    match service.update_supplier(&supplier_id, payload).await {
        Ok(supplier) => Ok(ResponseJson(ApiResponse::success(
            supplier,
            "Supplier updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deactivates a supplier so new purchase orders cannot use it.
#[axum::debug_handler]
pub async fn deactivate_supplier(
    Extension(pool): Extension<SqlitePool>,
    Path(supplier_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = SupplierService::new(&pool);
    match service.deactivate_supplier(&supplier_id).await {
        Ok(supplier) => Ok(ResponseJson(ApiResponse::success(
            supplier,
            "Supplier deactivated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
