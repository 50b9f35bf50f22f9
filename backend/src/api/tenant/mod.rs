//! Module for tenant administration API endpoints.
//!
//! Covers public pharmacy onboarding and tenant-level queries.

pub mod handlers;
pub mod routes;
