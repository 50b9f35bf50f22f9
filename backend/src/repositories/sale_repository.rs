//! Database repository for sales and their line items.

use crate::{
    api::common::PaginationFilter,
    database::models::{Sale, SaleItem, SaleStatus},
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

const SALE_COLUMNS: &str = "id, tenant_id, branch_id, receipt_number, client_reference, \
                            cashier_id, status, payment_method, credit_account_id, \
                            subtotal_cents, vat_cents, total_cents, amount_tendered_cents, \
                            change_due_cents, voided_by, voided_at, created_at";

const ITEM_COLUMNS: &str = "id, sale_id, product_id, quantity, unit_price_cents, vat_rate_bps, \
                            line_net_cents, line_vat_cents, line_total_cents";

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> SaleRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> Result<()> {
        sqlx::query(
            "INSERT INTO sales (id, tenant_id, branch_id, receipt_number, client_reference,
                                cashier_id, status, payment_method, credit_account_id,
                                subtotal_cents, vat_cents, total_cents, amount_tendered_cents,
                                change_due_cents, voided_by, voided_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sale.id)
        .bind(&sale.tenant_id)
        .bind(&sale.branch_id)
        .bind(&sale.receipt_number)
        .bind(&sale.client_reference)
        .bind(&sale.cashier_id)
        .bind(sale.status)
        .bind(sale.payment_method)
        .bind(&sale.credit_account_id)
        .bind(sale.subtotal_cents)
        .bind(sale.vat_cents)
        .bind(sale.total_cents)
        .bind(sale.amount_tendered_cents)
        .bind(sale.change_due_cents)
        .bind(&sale.voided_by)
        .bind(sale.voided_at)
        .bind(sale.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn insert_item(conn: &mut SqliteConnection, item: &SaleItem) -> Result<()> {
        sqlx::query(
            "INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents,
                                     vat_rate_bps, line_net_cents, line_vat_cents, line_total_cents)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.vat_rate_bps)
        .bind(item.line_net_cents)
        .bind(item.line_vat_cents)
        .bind(item.line_total_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn get_sale_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(sale)
    }

    /// Idempotency lookup: the sale previously stored under this client
    /// reference, if any.
    pub async fn get_sale_by_client_reference(
        &self,
        tenant_id: &str,
        client_reference: &str,
    ) -> Result<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE tenant_id = ? AND client_reference = ?"
        ))
        .bind(tenant_id)
        .bind(client_reference)
        .fetch_optional(self.pool)
        .await?;

        Ok(sale)
    }

    pub async fn get_items(&self, sale_id: &str) -> Result<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?"
        ))
        .bind(sale_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_sales(
        &self,
        tenant_id: &str,
        statuses: Option<&[SaleStatus]>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Sale>> {
        let status_list = Self::status_list(statuses);
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales
             WHERE tenant_id = ?
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || status || ',%')
               AND (? IS NULL OR date(created_at) >= ?)
               AND (? IS NULL OR date(created_at) <= ?)
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(&status_list)
        .bind(&status_list)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn count_sales(
        &self,
        tenant_id: &str,
        statuses: Option<&[SaleStatus]>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<u64> {
        let status_list = Self::status_list(statuses);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales
             WHERE tenant_id = ?
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || status || ',%')
               AND (? IS NULL OR date(created_at) >= ?)
               AND (? IS NULL OR date(created_at) <= ?)",
        )
        .bind(tenant_id)
        .bind(&status_list)
        .bind(&status_list)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Stamps a completed sale as voided. Affects zero rows when the sale is
    /// already voided, which callers treat as an invalid operation.
    pub async fn mark_voided(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
        voided_by: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE sales SET status = ?, voided_by = ?, voided_at = ?
             WHERE id = ? AND tenant_id = ? AND status = ?",
        )
        .bind(SaleStatus::Voided)
        .bind(voided_by)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .bind(SaleStatus::Completed)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn status_list(statuses: Option<&[SaleStatus]>) -> Option<String> {
        statuses.map(|statuses| {
            statuses
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}
