//! Defines the HTTP routes for sales.
//!
//! Any authenticated cashier can sell; voiding requires a manager.

use super::handlers::{create_sale, get_sale, list_sales, void_sale};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn sale_router() -> Router {
    Router::new()
        .route(
            "/create-sale",
            post(create_sale).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/get-sale/{id}",
            get(get_sale).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-sales",
            get(list_sales).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/void-sale/{id}",
            post(void_sale).layer(middleware::from_fn(require_manager)),
        )
}
