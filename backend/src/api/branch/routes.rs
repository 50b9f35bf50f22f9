//! Defines the HTTP routes for branch administration.
//!
//! Mutations are admin-only; reads require any authenticated user.

use super::handlers::{
    create_branch, deactivate_branch, get_branch, list_branches, update_branch,
};
use crate::auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn branch_router() -> Router {
    Router::new()
        .route(
            "/create-branch",
            post(create_branch).layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/get-branch/{id}",
            get(get_branch).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-branches",
            get(list_branches).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/update-branch/{id}",
            post(update_branch).layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/deactivate-branch/{id}",
            post(deactivate_branch).layer(middleware::from_fn(require_admin)),
        )
}
