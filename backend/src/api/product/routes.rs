//! Defines the HTTP routes for the product catalog.
//!
//! Catalog mutations require a manager; reads require any authenticated
//! user.

use super::handlers::{
    create_product, deactivate_product, get_product, list_products, update_product,
};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn product_router() -> Router {
    Router::new()
        .route(
            "/create-product",
            post(create_product).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/get-product/{id}",
            get(get_product).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-products",
            get(list_products).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/update-product/{id}",
            post(update_product).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/deactivate-product/{id}",
            post(deactivate_product).layer(middleware::from_fn(require_manager)),
        )
}
