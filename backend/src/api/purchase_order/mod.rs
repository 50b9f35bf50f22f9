//! Module for purchase order API endpoints.
//!
//! Covers the draft, submit, receive and cancel lifecycle.

pub mod handlers;
pub mod routes;
