//! Defines the HTTP routes for inventory.
//!
//! Adjustments require a manager; stock queries require any authenticated
//! user.

use super::handlers::{
    adjust_stock, get_stock_level, list_branch_stock, list_low_stock, list_movements,
};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn inventory_router() -> Router {
    Router::new()
        .route(
            "/get-stock-level/{branch_id}/{product_id}",
            get(get_stock_level).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-branch-stock/{branch_id}",
            get(list_branch_stock).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-low-stock/{branch_id}",
            get(list_low_stock).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-movements/{branch_id}",
            get(list_movements).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/adjust-stock",
            post(adjust_stock).layer(middleware::from_fn(require_manager)),
        )
}
