//! Database repository for branch management operations.

use crate::{api::common::PaginationFilter, database::models::Branch};
use anyhow::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

const BRANCH_COLUMNS: &str = "id, tenant_id, name, address, phone, is_active, created_at, \
                              updated_at, is_deleted, deleted_at";

/// Repository for branch database operations.
pub struct BranchRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> BranchRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_branch(conn: &mut SqliteConnection, branch: &Branch) -> Result<()> {
        sqlx::query(
            "INSERT INTO branches (id, tenant_id, name, address, phone, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&branch.id)
        .bind(&branch.tenant_id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(&branch.phone)
        .bind(branch.is_active)
        .bind(branch.created_at)
        .bind(branch.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn create_branch(&self, branch: &Branch) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_branch(&mut conn, branch).await
    }

    pub async fn get_branch_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branches
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(branch)
    }

    /// `true` if a live branch of this tenant already uses this name.
    pub async fn branch_name_exists(&self, tenant_id: &str, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM branches WHERE tenant_id = ? AND name = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_branches(
        &self,
        tenant_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branches
             WHERE tenant_id = ? AND is_deleted = 0
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(branches)
    }

    pub async fn count_branches(&self, tenant_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM branches WHERE tenant_id = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Applies the optional fields of an update; untouched fields keep their
    /// stored values.
    pub async fn update_branch(
        &self,
        tenant_id: &str,
        id: &str,
        name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE branches
             SET name = COALESCE(?, name),
                 address = COALESCE(?, address),
                 phone = COALESCE(?, phone),
                 updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate_branch(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE branches SET is_active = 0, updated_at = ?
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
