//! Module for staff user management API endpoints.

pub mod handlers;
pub mod routes;
