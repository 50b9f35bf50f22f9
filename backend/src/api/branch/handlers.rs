//! Handler functions for branch administration API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{Branch, CreateBranch, UpdateBranch};
use crate::services::branch_service::BranchService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Creates a new branch.
#[axum::debug_handler]
pub async fn create_branch(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateBranch>,
) -> Result<ResponseJson<ApiResponse<Branch>>, (StatusCode, String)> {
    let service = BranchService::new(&pool);
    match service.create_branch(payload).await {
        Ok(branch) => Ok(ResponseJson(ApiResponse::success(
            branch,
            "Branch created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a branch by its ID.
#[axum::debug_handler]
pub async fn get_branch(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Branch>>, (StatusCode, String)> {
    let service = BranchService::new(&pool);
    match service.get_branch_required(&id).await {
        Ok(branch) => Ok(ResponseJson(ApiResponse::success(
            branch,
            "Branch retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists the tenant's branches.
#[axum::debug_handler]
pub async fn list_branches(
    Extension(pool): Extension<SqlitePool>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Branch>>>, (StatusCode, String)> {
    let service = BranchService::new(&pool);
    match service.list_branches(&pagination).await {
        Ok(branches) => Ok(ResponseJson(ApiResponse::paginated(
            branches.items,
            PaginationMeta::from_filter(&pagination, branches.total),
            "Branches retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates a branch.
#[axum::debug_handler]
pub async fn update_branch(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBranch>,
) -> Result<ResponseJson<ApiResponse<Branch>>, (StatusCode, String)> {
    let service = BranchService::new(&pool);
    match service.update_branch(&id, payload).await {
        Ok(branch) => Ok(ResponseJson(ApiResponse::success(
            branch,
            "Branch updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deactivates a branch.
#[axum::debug_handler]
pub async fn deactivate_branch(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = BranchService::new(&pool);
    match service.deactivate_branch(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Branch deactivated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
