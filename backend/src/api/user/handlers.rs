//! Handler functions for staff user management API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{ChangeUserRole, CreateUser, User};
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Creates a new staff user.
#[axum::debug_handler]
pub async fn create_user(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.create_user(payload).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a user by its ID.
#[axum::debug_handler]
pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<User>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.get_user_required(&id).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists the tenant's staff users.
#[axum::debug_handler]
pub async fn list_users(
    Extension(pool): Extension<SqlitePool>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.list_users(&pagination).await {
        Ok(users) => Ok(ResponseJson(ApiResponse::paginated(
            users.items,
            PaginationMeta::from_filter(&pagination, users.total),
            "Users retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Changes a user's role.
#[axum::debug_handler]
pub async fn change_user_role(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeUserRole>,
) -> Result<ResponseJson<ApiResponse<User>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.change_role(&id, payload.role).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User role changed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deactivates a user.
#[axum::debug_handler]
pub async fn deactivate_user(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.deactivate_user(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "User deactivated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
