//! Database repository for tenant records.

use crate::database::models::Tenant;
use anyhow::Result;
use sqlx::{SqliteConnection, SqlitePool};

const TENANT_COLUMNS: &str =
    "id, name, contact_email, is_active, created_at, updated_at, is_deleted, deleted_at";

/// Repository for tenant database operations.
pub struct TenantRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> TenantRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a tenant inside a caller-owned transaction; onboarding creates
    /// the tenant, its first branch and its admin user atomically.
    pub async fn insert_tenant(conn: &mut SqliteConnection, tenant: &Tenant) -> Result<()> {
        sqlx::query(
            "INSERT INTO tenants (id, name, contact_email, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.contact_email)
        .bind(tenant.is_active)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn get_tenant_by_id(&self, id: &str) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tenant)
    }

    /// `true` if a live tenant already uses this name.
    pub async fn tenant_name_exists(&self, name: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE name = ? AND is_deleted = 0")
                .bind(name)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }
}
