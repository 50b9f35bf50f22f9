//! Module for expense tracking API endpoints.

pub mod handlers;
pub mod routes;
