//! Database repositories, one per aggregate.
//!
//! Repositories own the SQL for their aggregate. Every query on a
//! tenant-owned table filters by the tenant id passed in from the service
//! layer; methods that must run inside a caller-owned transaction take a
//! `&mut SqliteConnection` instead of using the pool.

pub mod branch_repository;
pub mod credit_repository;
pub mod expense_repository;
pub mod inventory_repository;
pub mod product_repository;
pub mod purchase_order_repository;
pub mod report_repository;
pub mod sale_repository;
pub mod supplier_repository;
pub mod tenant_repository;
pub mod user_repository;
