//! Module for inventory API endpoints.
//!
//! Stock queries, the movement ledger and manual adjustments.

pub mod handlers;
pub mod routes;
