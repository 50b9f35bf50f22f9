//! Defines the HTTP routes for suppliers.

use super::handlers::{
    create_supplier, deactivate_supplier, get_supplier, list_suppliers, update_supplier,
};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn supplier_router() -> Router {
    Router::new()
        .route(
            "/create-supplier",
            post(create_supplier).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/get-supplier/{id}",
            get(get_supplier).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-suppliers",
            get(list_suppliers).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/update-supplier/{id}",
            post(update_supplier).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/deactivate-supplier/{id}",
            post(deactivate_supplier).layer(middleware::from_fn(require_manager)),
        )
}
