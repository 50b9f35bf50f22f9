//! Defines the HTTP routes for purchase orders.
//!
//! Lifecycle transitions require a manager; reads require any
//! authenticated user.

use super::handlers::{
    cancel_purchase_order, create_purchase_order, get_purchase_order, list_purchase_orders,
    receive_purchase_order, submit_purchase_order,
};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn purchase_order_router() -> Router {
    Router::new()
        .route(
            "/create-purchase-order",
            post(create_purchase_order).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/get-purchase-order/{id}",
            get(get_purchase_order).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-purchase-orders",
            get(list_purchase_orders).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/submit-purchase-order/{id}",
            post(submit_purchase_order).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/receive-purchase-order/{id}",
            post(receive_purchase_order).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/cancel-purchase-order/{id}",
            post(cancel_purchase_order).layer(middleware::from_fn(require_manager)),
        )
}
