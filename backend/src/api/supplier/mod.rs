//! Module for supplier management API endpoints.

pub mod handlers;
pub mod routes;
