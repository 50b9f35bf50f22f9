//! Database repository for user management operations.
//!
//! Provides CRUD operations for staff users. The lookup by username is the
//! only deliberately unscoped read: the authentication middleware resolves
//! token subjects before any tenant is established.

use crate::{
    api::common::PaginationFilter,
    database::models::{User, UserRole},
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

const USER_COLUMNS: &str = "id, tenant_id, branch_id, username, email, password_hash, role, \
                            is_active, created_at, updated_at, is_deleted, deleted_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_user(conn: &mut SqliteConnection, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, tenant_id, branch_id, username, email, password_hash, role, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&user.id)
        .bind(&user.tenant_id)
        .bind(&user.branch_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_user(&mut conn, user).await
    }

    pub async fn get_user_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Unscoped by design: used to resolve token subjects and logins before
    /// a tenant context exists. Usernames are globally unique.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? AND is_deleted = 0"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND is_deleted = 0")
                .bind(username)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND is_deleted = 0")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn list_users(
        &self,
        tenant_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE tenant_id = ? AND is_deleted = 0
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count_users(&self, tenant_id: &str) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = ? AND is_deleted = 0")
                .bind(tenant_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count as u64)
    }

    pub async fn change_role(&self, tenant_id: &str, id: &str, role: UserRole) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET role = ?, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate_user(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_active = 0, updated_at = ?
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
