//! Module for product catalog API endpoints.

pub mod handlers;
pub mod routes;
