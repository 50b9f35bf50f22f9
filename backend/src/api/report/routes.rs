//! Defines the HTTP routes for reports. All of them require a manager.

use super::handlers::{financial_snapshot, sales_summary, stock_variance, vat_report};
use crate::auth::middleware::require_manager;
use axum::{Router, middleware, routing::get};

pub async fn report_router() -> Router {
    Router::new()
        .route(
            "/sales-summary",
            get(sales_summary).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/vat-report",
            get(vat_report).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/stock-variance/{branch_id}",
            get(stock_variance).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/financial-snapshot",
            get(financial_snapshot).layer(middleware::from_fn(require_manager)),
        )
}
