//! Defines the HTTP routes for expenses.

use super::handlers::{create_expense, delete_expense, get_expense, list_expenses};
use crate::auth::middleware::{require_auth, require_manager};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub async fn expense_router() -> Router {
    Router::new()
        .route(
            "/create-expense",
            post(create_expense).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/get-expense/{id}",
            get(get_expense).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/list-expenses",
            get(list_expenses).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/delete-expense/{id}",
            post(delete_expense).layer(middleware::from_fn(require_manager)),
        )
}
