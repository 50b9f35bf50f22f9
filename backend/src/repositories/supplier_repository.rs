//! Database repository for supplier management operations.

use crate::{api::common::PaginationFilter, database::models::Supplier};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const SUPPLIER_COLUMNS: &str = "id, tenant_id, name, contact_person, phone, email, is_active, \
                                created_at, updated_at, is_deleted, deleted_at";

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> SupplierRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_supplier(&self, supplier: &Supplier) -> Result<()> {
        sqlx::query(
            "INSERT INTO suppliers (id, tenant_id, name, contact_person, phone, email, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&supplier.id)
        .bind(&supplier.tenant_id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(supplier.is_active)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_supplier_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn supplier_name_exists(&self, tenant_id: &str, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM suppliers WHERE tenant_id = ? AND name = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_suppliers(
        &self,
        tenant_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers
             WHERE tenant_id = ? AND is_deleted = 0
             ORDER BY name
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn count_suppliers(&self, tenant_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM suppliers WHERE tenant_id = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    pub async fn update_supplier(
        &self,
        tenant_id: &str,
        id: &str,
        name: Option<&str>,
        contact_person: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE suppliers
             SET name = COALESCE(?, name),
                 contact_person = COALESCE(?, contact_person),
                 phone = COALESCE(?, phone),
                 email = COALESCE(?, email),
                 updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(name)
        .bind(contact_person)
        .bind(phone)
        .bind(email)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate_supplier(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = 0, updated_at = ?
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
