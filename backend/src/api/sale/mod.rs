//! Module for point-of-sale API endpoints.

pub mod handlers;
pub mod routes;
