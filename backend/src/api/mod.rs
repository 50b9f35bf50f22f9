//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for different API domains,
//! such as the product catalog, point-of-sale and reporting, excluding
//! core authentication routes which are handled separately.

pub mod branch;
pub mod common;
pub mod credit;
pub mod expense;
pub mod inventory;
pub mod product;
pub mod purchase_order;
pub mod report;
pub mod sale;
pub mod supplier;
pub mod tenant;
pub mod user;
