//! Handler functions for tenant administration API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateTenant, Tenant, TenantOnboarding, User};
use crate::services::tenant_service::TenantService;
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Onboards a new pharmacy. This is the one public mutation in the API.
#[axum::debug_handler]
pub async fn create_tenant(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateTenant>,
) -> Result<ResponseJson<ApiResponse<TenantOnboarding>>, (StatusCode, String)> {
    let service = TenantService::new(&pool);
    match service.onboard_tenant(payload).await {
        Ok(onboarding) => Ok(ResponseJson(ApiResponse::success(
            onboarding,
            "Tenant onboarded successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves the tenant of the authenticated request.
#[axum::debug_handler]
pub async fn get_tenant(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Tenant>>, (StatusCode, String)> {
    let service = TenantService::new(&pool);
    match service.get_current_tenant().await {
        Ok(tenant) => Ok(ResponseJson(ApiResponse::success(
            tenant,
            "Tenant retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists all staff users of the tenant.
#[axum::debug_handler]
pub async fn get_tenant_users(
    Extension(pool): Extension<SqlitePool>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, (StatusCode, String)> {
    let service = TenantService::new(&pool);
    match service.get_tenant_users(&pagination).await {
        Ok(users) => Ok(ResponseJson(ApiResponse::paginated(
            users.items,
            PaginationMeta::from_filter(&pagination, users.total),
            "Tenant users retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
