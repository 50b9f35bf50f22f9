//! Read-only SQL aggregates behind the reporting endpoints.
//!
//! Reports never mutate state; each is a single grouped query over the
//! sales, movement or expense tables, scoped to one tenant.

use crate::database::models::{SalesSummary, StockVarianceRow, VatDay};
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Repository for reporting queries.
pub struct ReportRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ReportRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Sales totals and payment-method breakdown. Gross, VAT and net count
    /// completed sales only; voided sales appear solely in `voided_count`.
    pub async fn sales_summary(
        &self,
        tenant_id: &str,
        branch_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<SalesSummary> {
        let summary = sqlx::query_as::<_, SalesSummary>(
            "SELECT
                COUNT(CASE WHEN status = 'Completed' THEN 1 END) AS sale_count,
                COUNT(CASE WHEN status = 'Voided' THEN 1 END) AS voided_count,
                COALESCE(SUM(CASE WHEN status = 'Completed' THEN total_cents END), 0) AS gross_cents,
                COALESCE(SUM(CASE WHEN status = 'Completed' THEN vat_cents END), 0) AS vat_cents,
                COALESCE(SUM(CASE WHEN status = 'Completed' THEN subtotal_cents END), 0) AS net_cents,
                COALESCE(SUM(CASE WHEN status = 'Completed' AND payment_method = 'Cash' THEN total_cents END), 0) AS cash_cents,
                COALESCE(SUM(CASE WHEN status = 'Completed' AND payment_method = 'Card' THEN total_cents END), 0) AS card_cents,
                COALESCE(SUM(CASE WHEN status = 'Completed' AND payment_method = 'Credit' THEN total_cents END), 0) AS credit_cents
             FROM sales
             WHERE tenant_id = ?
               AND (? IS NULL OR branch_id = ?)
               AND (? IS NULL OR date(created_at) >= ?)
               AND (? IS NULL OR date(created_at) <= ?)",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(branch_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Taxable base and VAT collected per day, completed sales only.
    pub async fn vat_by_day(
        &self,
        tenant_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<VatDay>> {
        let days = sqlx::query_as::<_, VatDay>(
            "SELECT date(created_at) AS day,
                    COALESCE(SUM(subtotal_cents), 0) AS taxable_cents,
                    COALESCE(SUM(vat_cents), 0) AS vat_cents
             FROM sales
             WHERE tenant_id = ? AND status = 'Completed'
               AND (? IS NULL OR date(created_at) >= ?)
               AND (? IS NULL OR date(created_at) <= ?)
             GROUP BY date(created_at)
             ORDER BY day",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(days)
    }

    /// Per-product movement totals for one branch. Negative adjustment
    /// totals indicate shrinkage.
    pub async fn stock_variance(
        &self,
        tenant_id: &str,
        branch_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<StockVarianceRow>> {
        let rows = sqlx::query_as::<_, StockVarianceRow>(
            "SELECT p.id AS product_id, p.name AS product_name,
                    COALESCE(SUM(CASE WHEN m.movement_type = 'PurchaseReceipt' THEN m.quantity_change END), 0) AS received_qty,
                    COALESCE(SUM(CASE WHEN m.movement_type = 'Sale' THEN -m.quantity_change END), 0) AS sold_qty,
                    COALESCE(SUM(CASE WHEN m.movement_type = 'SaleReversal' THEN m.quantity_change END), 0) AS returned_qty,
                    COALESCE(SUM(CASE WHEN m.movement_type = 'Adjustment' THEN m.quantity_change END), 0) AS adjusted_qty
             FROM stock_movements m
             JOIN products p ON p.id = m.product_id
             WHERE m.tenant_id = ? AND m.branch_id = ?
               AND (? IS NULL OR date(m.created_at) >= ?)
               AND (? IS NULL OR date(m.created_at) <= ?)
             GROUP BY p.id, p.name
             ORDER BY p.name",
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Net revenue of completed sales (VAT excluded).
    pub async fn revenue(
        &self,
        tenant_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<i64> {
        let revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(subtotal_cents), 0) FROM sales
             WHERE tenant_id = ? AND status = 'Completed'
               AND (? IS NULL OR date(created_at) >= ?)
               AND (? IS NULL OR date(created_at) <= ?)",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(revenue)
    }

    /// Cost of goods sold, valued at the product's current cost price.
    pub async fn cost_of_goods_sold(
        &self,
        tenant_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<i64> {
        let cogs: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(si.quantity * p.cost_price_cents), 0)
             FROM sale_items si
             JOIN sales s ON s.id = si.sale_id
             JOIN products p ON p.id = si.product_id
             WHERE s.tenant_id = ? AND s.status = 'Completed'
               AND (? IS NULL OR date(s.created_at) >= ?)
               AND (? IS NULL OR date(s.created_at) <= ?)",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(cogs)
    }

    pub async fn expenses_total(
        &self,
        tenant_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses
             WHERE tenant_id = ? AND is_deleted = 0
               AND (? IS NULL OR incurred_on >= ?)
               AND (? IS NULL OR incurred_on <= ?)",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}
