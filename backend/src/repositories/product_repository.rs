//! Database repository for the product catalog.

use crate::{api::common::PaginationFilter, database::models::Product};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const PRODUCT_COLUMNS: &str = "id, tenant_id, sku, name, generic_name, category, unit, \
                               cost_price_cents, selling_price_cents, vat_rate_bps, \
                               reorder_level, is_active, created_at, updated_at, is_deleted, \
                               deleted_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, tenant_id, sku, name, generic_name, category, unit,
                                   cost_price_cents, selling_price_cents, vat_rate_bps,
                                   reorder_level, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.generic_name)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.vat_rate_bps)
        .bind(product.reorder_level)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_product_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// `true` if a live product of this tenant already uses this SKU.
    pub async fn sku_exists(&self, tenant_id: &str, sku: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE tenant_id = ? AND sku = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .bind(sku)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Lists products, optionally narrowed by a name/SKU search term.
    pub async fn list_products(
        &self,
        tenant_id: &str,
        search: Option<&str>,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Product>> {
        let pattern = search.map(|term| format!("%{term}%"));
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE tenant_id = ? AND is_deleted = 0
               AND (? IS NULL OR name LIKE ? OR sku LIKE ?)
             ORDER BY name
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    pub async fn count_products(&self, tenant_id: &str, search: Option<&str>) -> Result<u64> {
        let pattern = search.map(|term| format!("%{term}%"));
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products
             WHERE tenant_id = ? AND is_deleted = 0
               AND (? IS NULL OR name LIKE ? OR sku LIKE ?)",
        )
        .bind(tenant_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Applies the optional fields of an update; untouched fields keep their
    /// stored values.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        tenant_id: &str,
        id: &str,
        name: Option<&str>,
        generic_name: Option<&str>,
        category: Option<&str>,
        unit: Option<&str>,
        cost_price_cents: Option<i64>,
        selling_price_cents: Option<i64>,
        vat_rate_bps: Option<i64>,
        reorder_level: Option<i64>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE products
             SET name = COALESCE(?, name),
                 generic_name = COALESCE(?, generic_name),
                 category = COALESCE(?, category),
                 unit = COALESCE(?, unit),
                 cost_price_cents = COALESCE(?, cost_price_cents),
                 selling_price_cents = COALESCE(?, selling_price_cents),
                 vat_rate_bps = COALESCE(?, vat_rate_bps),
                 reorder_level = COALESCE(?, reorder_level),
                 updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(name)
        .bind(generic_name)
        .bind(category)
        .bind(unit)
        .bind(cost_price_cents)
        .bind(selling_price_cents)
        .bind(vat_rate_bps)
        .bind(reorder_level)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate_product(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
