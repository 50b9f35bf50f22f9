//! Database repository for customer credit accounts and repayments.
//!
//! Balance mutations are guarded in SQL: a charge must stay within the
//! credit limit and a repayment must not exceed the outstanding balance.

use crate::{
    api::common::PaginationFilter,
    database::models::{CreditAccount, CreditPayment},
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

const ACCOUNT_COLUMNS: &str = "id, tenant_id, customer_name, phone, credit_limit_cents, \
                               balance_cents, is_active, created_at, updated_at, is_deleted, \
                               deleted_at";

const PAYMENT_COLUMNS: &str =
    "id, tenant_id, credit_account_id, amount_cents, method, reference, recorded_by, created_at";

/// Repository for credit account database operations.
pub struct CreditRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CreditRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_account(&self, account: &CreditAccount) -> Result<()> {
        sqlx::query(
            "INSERT INTO credit_accounts (id, tenant_id, customer_name, phone, credit_limit_cents,
                                          balance_cents, is_active, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&account.id)
        .bind(&account.tenant_id)
        .bind(&account.customer_name)
        .bind(&account.phone)
        .bind(account.credit_limit_cents)
        .bind(account.balance_cents)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_account_by_id(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<CreditAccount>> {
        let account = sqlx::query_as::<_, CreditAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM credit_accounts
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// `true` if a live account of this tenant already uses this phone number.
    pub async fn phone_exists(&self, tenant_id: &str, phone: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM credit_accounts
             WHERE tenant_id = ? AND phone = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .bind(phone)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_accounts(
        &self,
        tenant_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<CreditAccount>> {
        let accounts = sqlx::query_as::<_, CreditAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM credit_accounts
             WHERE tenant_id = ? AND is_deleted = 0
             ORDER BY customer_name
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(accounts)
    }

    pub async fn count_accounts(&self, tenant_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM credit_accounts WHERE tenant_id = ? AND is_deleted = 0",
        )
        .bind(tenant_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    pub async fn update_credit_limit(
        &self,
        tenant_id: &str,
        id: &str,
        credit_limit_cents: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE credit_accounts SET credit_limit_cents = ?, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(credit_limit_cents)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deactivation is only allowed once the customer owes nothing.
    pub async fn deactivate_if_settled(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE credit_accounts SET is_active = 0, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0 AND balance_cents = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Charges a credit sale to the account, refusing to cross the credit
    /// limit or touch an inactive account. Returns `false` when refused.
    pub async fn try_charge(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
        amount_cents: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE credit_accounts
             SET balance_cents = balance_cents + ?, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0 AND is_active = 1
               AND balance_cents + ? <= credit_limit_cents",
        )
        .bind(amount_cents)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .bind(amount_cents)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reduces the balance, refusing to go below zero. Returns `false` when
    /// the reduction exceeds the outstanding balance.
    pub async fn try_reduce_balance(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
        amount_cents: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE credit_accounts
             SET balance_cents = balance_cents - ?, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0 AND balance_cents >= ?",
        )
        .bind(amount_cents)
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id)
        .bind(amount_cents)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_payment(conn: &mut SqliteConnection, payment: &CreditPayment) -> Result<()> {
        sqlx::query(
            "INSERT INTO credit_payments (id, tenant_id, credit_account_id, amount_cents, method,
                                          reference, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payment.id)
        .bind(&payment.tenant_id)
        .bind(&payment.credit_account_id)
        .bind(payment.amount_cents)
        .bind(payment.method)
        .bind(&payment.reference)
        .bind(&payment.recorded_by)
        .bind(payment.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn list_payments(
        &self,
        tenant_id: &str,
        credit_account_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<CreditPayment>> {
        let payments = sqlx::query_as::<_, CreditPayment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM credit_payments
             WHERE tenant_id = ? AND credit_account_id = ?
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(credit_account_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn count_payments(&self, tenant_id: &str, credit_account_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM credit_payments
             WHERE tenant_id = ? AND credit_account_id = ?",
        )
        .bind(tenant_id)
        .bind(credit_account_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }
}
