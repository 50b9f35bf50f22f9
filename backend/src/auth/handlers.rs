//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, token refresh
//! and identity lookup, and delegate to `auth::service` for the business
//! logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, UserInfo};
use crate::auth::principal::AuthPrincipal;
use crate::auth::service::AuthService;
use crate::utils::jwt::TokenService;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match AuthService::new(&pool, &tokens).login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<RefreshTokenResponse>, (StatusCode, String)> {
    match AuthService::new(&pool, &tokens).refresh_token(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    // Tokens are stateless; the client discards them. A server-side denylist
    // can be added here if revocation is ever needed.
    Ok(ResponseJson(serde_json::json!({
        "message": "Logged out successfully"
    })))
}

/// Get current user information from the authenticated principal
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<UserInfo>, (StatusCode, String)> {
    match AuthService::new(&pool, &tokens).current_user(&principal).await {
        Ok(user) => Ok(ResponseJson(user)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
