//! Authentication and tenancy module.
//!
//! Owns the login and token-refresh endpoints, the request middleware that
//! resolves a bearer token into an authenticated principal, and the
//! task-local tenant context every scoped query reads from.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod principal;
pub mod routes;
pub mod service;
pub mod tenant_context;
