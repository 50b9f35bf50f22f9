//! Collection of general utility functions and common traits.
//!
//! This module serves as a repository for small, reusable helper functions
//! or traits that do not fit into other specific domain modules.

pub mod jwt;
pub mod money;
pub mod reference;
