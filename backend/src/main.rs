//! Main entry point for the PharmaPOS backend.
//!
//! This file initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use crate::auth::middleware::tenant_context;
use crate::auth::principal::{DbPrincipalLookup, SharedPrincipalLookup};
use crate::utils::jwt::TokenService;
use axum::{Extension, Router, middleware, response::Json, routing::get};
use config::Config;
use database::Database;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let tokens = Arc::new(TokenService::from_config(&config));
    let lookup: SharedPrincipalLookup = Arc::new(DbPrincipalLookup::new(pool.clone()));

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/tenant", api::tenant::routes::tenant_router().await)
        .nest("/api/branch", api::branch::routes::branch_router().await)
        .nest("/api/user", api::user::routes::user_router().await)
        .nest("/api/product", api::product::routes::product_router().await)
        .nest(
            "/api/inventory",
            api::inventory::routes::inventory_router().await,
        )
        .nest(
            "/api/supplier",
            api::supplier::routes::supplier_router().await,
        )
        .nest(
            "/api/purchase-order",
            api::purchase_order::routes::purchase_order_router().await,
        )
        .nest("/api/sale", api::sale::routes::sale_router().await)
        .nest("/api/credit", api::credit::routes::credit_router().await)
        .nest("/api/expense", api::expense::routes::expense_router().await)
        .nest("/api/report", api::report::routes::report_router().await)
        .layer(middleware::from_fn(tenant_context))
        .layer(Extension(pool))
        .layer(Extension(tokens))
        .layer(Extension(lookup));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting PharmaPOS server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "PharmaPOS Backend",
            "version": "0.1.0"
        }),
        "Welcome to the PharmaPOS API",
    ))
}
