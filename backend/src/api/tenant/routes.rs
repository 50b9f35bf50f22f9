//! Defines the HTTP routes for tenant administration.

use super::handlers::{create_tenant, get_tenant, get_tenant_users};
use crate::auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn tenant_router() -> Router {
    Router::new()
        .route("/create-tenant", post(create_tenant))
        .route(
            "/get-tenant",
            get(get_tenant).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/get-tenant-users",
            get(get_tenant_users).layer(middleware::from_fn(require_admin)),
        )
}
