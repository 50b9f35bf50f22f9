//! Database repository for purchase orders and their line items.

use crate::{
    api::common::PaginationFilter,
    database::models::{PurchaseOrder, PurchaseOrderItem, PurchaseOrderStatus},
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "id, tenant_id, branch_id, supplier_id, reference, status, \
                             expected_date, created_by, received_at, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, purchase_order_id, product_id, quantity_ordered, quantity_received, unit_cost_cents";

/// Repository for purchase order database operations.
pub struct PurchaseOrderRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> PurchaseOrderRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_order(conn: &mut SqliteConnection, order: &PurchaseOrder) -> Result<()> {
        sqlx::query(
            "INSERT INTO purchase_orders (id, tenant_id, branch_id, supplier_id, reference, status,
                                          expected_date, created_by, received_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.id)
        .bind(&order.tenant_id)
        .bind(&order.branch_id)
        .bind(&order.supplier_id)
        .bind(&order.reference)
        .bind(order.status)
        .bind(order.expected_date)
        .bind(&order.created_by)
        .bind(order.received_at)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn insert_item(conn: &mut SqliteConnection, item: &PurchaseOrderItem) -> Result<()> {
        sqlx::query(
            "INSERT INTO purchase_order_items (id, purchase_order_id, product_id, quantity_ordered,
                                               quantity_received, unit_cost_cents)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.purchase_order_id)
        .bind(&item.product_id)
        .bind(item.quantity_ordered)
        .bind(item.quantity_received)
        .bind(item.unit_cost_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn get_order_by_id(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<PurchaseOrder>> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    pub async fn get_items(&self, purchase_order_id: &str) -> Result<Vec<PurchaseOrderItem>> {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM purchase_order_items WHERE purchase_order_id = ?"
        ))
        .bind(purchase_order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_orders(
        &self,
        tenant_id: &str,
        statuses: Option<&[PurchaseOrderStatus]>,
        pagination: &PaginationFilter,
    ) -> Result<Vec<PurchaseOrder>> {
        let status_list = Self::status_list(statuses);
        let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders
             WHERE tenant_id = ?
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || status || ',%')
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(&status_list)
        .bind(&status_list)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn count_orders(
        &self,
        tenant_id: &str,
        statuses: Option<&[PurchaseOrderStatus]>,
    ) -> Result<u64> {
        let status_list = Self::status_list(statuses);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM purchase_orders
             WHERE tenant_id = ?
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || status || ',%')",
        )
        .bind(tenant_id)
        .bind(&status_list)
        .bind(&status_list)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Moves an order between statuses; the `WHERE` clause doubles as the
    /// state-machine guard, so an already-moved order affects zero rows.
    pub async fn transition_status(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
        received_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE purchase_orders
             SET status = ?, received_at = COALESCE(?, received_at), updated_at = ?
             WHERE id = ? AND tenant_id = ? AND status = ?",
        )
        .bind(to)
        .bind(received_at)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .bind(from)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_item_received(
        conn: &mut SqliteConnection,
        purchase_order_id: &str,
        product_id: &str,
        quantity_received: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE purchase_order_items SET quantity_received = ?
             WHERE purchase_order_id = ? AND product_id = ?",
        )
        .bind(quantity_received)
        .bind(purchase_order_id)
        .bind(product_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Statuses joined into a comma list for the SQL membership test above.
    fn status_list(statuses: Option<&[PurchaseOrderStatus]>) -> Option<String> {
        statuses.map(|statuses| {
            statuses
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}
