//! Module for customer credit account API endpoints.

pub mod handlers;
pub mod routes;
