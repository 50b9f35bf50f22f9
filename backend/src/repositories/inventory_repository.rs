//! Database repository for stock levels and the stock movement ledger.
//!
//! Stock mutations are always paired with an appended movement row and run
//! inside a caller-owned transaction. Deductions are guarded in SQL so a
//! stock level can never go negative, even under concurrent sales.

use crate::{
    api::common::PaginationFilter,
    database::models::{MovementType, StockLevel, StockLevelWithProduct, StockMovement},
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> InventoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_stock_level(
        &self,
        tenant_id: &str,
        branch_id: &str,
        product_id: &str,
    ) -> Result<Option<StockLevel>> {
        let level = sqlx::query_as::<_, StockLevel>(
            "SELECT id, tenant_id, branch_id, product_id, quantity_on_hand, updated_at
             FROM stock_levels
             WHERE tenant_id = ? AND branch_id = ? AND product_id = ?",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(level)
    }

    /// Adds stock, creating the level row on first receipt.
    pub async fn add_stock(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        branch_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO stock_levels (id, tenant_id, branch_id, product_id, quantity_on_hand, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (tenant_id, branch_id, product_id)
             DO UPDATE SET quantity_on_hand = quantity_on_hand + excluded.quantity_on_hand,
                           updated_at = excluded.updated_at",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Deducts stock only when enough is on hand. Returns `false` (and leaves
    /// the row untouched) when the deduction would go negative or no level
    /// row exists.
    pub async fn try_deduct_stock(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        branch_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE stock_levels
             SET quantity_on_hand = quantity_on_hand - ?, updated_at = ?
             WHERE tenant_id = ? AND branch_id = ? AND product_id = ?
               AND quantity_on_hand >= ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Appends one row to the movement ledger.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_movement(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        branch_id: &str,
        product_id: &str,
        movement_type: MovementType,
        quantity_change: i64,
        reference: &str,
        recorded_by: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO stock_movements (id, tenant_id, branch_id, product_id, movement_type,
                                          quantity_change, reference, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(movement_type)
        .bind(quantity_change)
        .bind(reference)
        .bind(recorded_by)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn list_branch_stock(
        &self,
        tenant_id: &str,
        branch_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<StockLevelWithProduct>> {
        let rows = sqlx::query_as::<_, StockLevelWithProduct>(
            "SELECT s.product_id, p.sku, p.name AS product_name, p.unit,
                    s.quantity_on_hand, p.reorder_level, s.updated_at
             FROM stock_levels s
             JOIN products p ON p.id = s.product_id
             WHERE s.tenant_id = ? AND s.branch_id = ? AND p.is_deleted = 0
             ORDER BY p.name
             LIMIT ? OFFSET ?",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_branch_stock(&self, tenant_id: &str, branch_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_levels s
             JOIN products p ON p.id = s.product_id
             WHERE s.tenant_id = ? AND s.branch_id = ? AND p.is_deleted = 0",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Stock at or below the product's reorder level.
    pub async fn list_low_stock(
        &self,
        tenant_id: &str,
        branch_id: &str,
    ) -> Result<Vec<StockLevelWithProduct>> {
        let rows = sqlx::query_as::<_, StockLevelWithProduct>(
            "SELECT s.product_id, p.sku, p.name AS product_name, p.unit,
                    s.quantity_on_hand, p.reorder_level, s.updated_at
             FROM stock_levels s
             JOIN products p ON p.id = s.product_id
             WHERE s.tenant_id = ? AND s.branch_id = ?
               AND p.is_deleted = 0 AND p.is_active = 1
               AND s.quantity_on_hand <= p.reorder_level
             ORDER BY s.quantity_on_hand",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_movements(
        &self,
        tenant_id: &str,
        branch_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, tenant_id, branch_id, product_id, movement_type, quantity_change,
                    reference, recorded_by, created_at
             FROM stock_movements
             WHERE tenant_id = ? AND branch_id = ?
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(movements)
    }

    pub async fn count_movements(&self, tenant_id: &str, branch_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_movements WHERE tenant_id = ? AND branch_id = ?",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }
}
