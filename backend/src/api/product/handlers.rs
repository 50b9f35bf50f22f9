//! Handler functions for product catalog API endpoints.

use crate::api::common::{ApiResponse, PaginationMeta, SearchFilter, service_error_to_http};
use crate::database::models::{CreateProduct, Product, UpdateProduct};
use crate::services::product_service::ProductService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Creates a new catalog product.
#[axum::debug_handler]
pub async fn create_product(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateProduct>,
) -> Result<ResponseJson<ApiResponse<Product>>, (StatusCode, String)> {
    let service = ProductService::new(&pool);
    match service.create_product(payload).await {
        Ok(product) => Ok(ResponseJson(ApiResponse::success(
            product,
            "Product created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a product by its ID.
#[axum::debug_handler]
pub async fn get_product(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Product>>, (StatusCode, String)> {
    let service = ProductService::new(&pool);
    match service.get_product_required(&id).await {
        Ok(product) => Ok(ResponseJson(ApiResponse::success(
            product,
            "Product retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists catalog products, optionally filtered by a search term matched
/// against name and SKU.
#[axum::debug_handler]
pub async fn list_products(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<SearchFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Product>>>, (StatusCode, String)> {
    let service = ProductService::new(&pool);
    match service.list_products(&filter).await {
        Ok(products) => Ok(ResponseJson(ApiResponse::paginated(
            products.items,
            PaginationMeta::from_filter(&filter.pagination(), products.total),
            "Products retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates a product.
#[axum::debug_handler]
pub async fn update_product(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProduct>,
) -> Result<ResponseJson<ApiResponse<Product>>, (StatusCode, String)> {
    let service = ProductService::new(&pool);
    match service.update_product(&id, payload).await {
        Ok(product) => Ok(ResponseJson(ApiResponse::success(
            product,
            "Product updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deactivates a product so it can no longer be sold or ordered.
#[axum::debug_handler]
pub async fn deactivate_product(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = ProductService::new(&pool);
    match service.deactivate_product(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Product deactivated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
