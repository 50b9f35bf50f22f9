//! Defines the HTTP routes for staff user management.
//!
//! Mutations are admin-only; reads require any authenticated user.

use super::handlers::{change_user_role, create_user, deactivate_user, get_user, list_users};
use crate::auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn user_router() -> Router {
    Router::new()
        .route(
            "/create-user",
            post(create_user).layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/get-user/{id}",
            get(get_user).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-users",
            get(list_users).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/change-user-role/{id}",
            post(change_user_role).layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/deactivate-user/{id}",
            post(deactivate_user).layer(middleware::from_fn(require_admin)),
        )
}
