//! Module for reporting API endpoints.
//!
//! Sales summaries, VAT returns, stock variance and the financial
//! snapshot.

pub mod handlers;
pub mod routes;
