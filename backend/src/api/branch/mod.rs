//! Module for branch administration API endpoints.

pub mod handlers;
pub mod routes;
