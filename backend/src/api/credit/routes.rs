//! Defines the HTTP routes for credit accounts.
//!
//! Account administration requires a manager; recording payments and
//! reads require any authenticated user.

use super::handlers::{
    create_credit_account, deactivate_credit_account, get_credit_account, list_credit_accounts,
    list_credit_payments, record_credit_payment, update_credit_limit,
};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn credit_router() -> Router {
    Router::new()
        .route(
            "/create-credit-account",
            post(create_credit_account).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/get-credit-account/{id}",
            get(get_credit_account).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-credit-accounts",
            get(list_credit_accounts).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/update-credit-limit/{id}",
            post(update_credit_limit).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/deactivate-credit-account/{id}",
            post(deactivate_credit_account).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/record-credit-payment/{id}",
            post(record_credit_payment).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-credit-payments/{id}",
            get(list_credit_payments).layer(middleware::from_fn(require_auth)),
        )
}
