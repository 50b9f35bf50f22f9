//! Database repository for operating expenses.

use crate::{
    api::common::PaginationFilter,
    database::models::{Expense, ExpenseCategory},
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

const EXPENSE_COLUMNS: &str = "id, tenant_id, branch_id, category, description, amount_cents, \
                               incurred_on, recorded_by, created_at, updated_at, is_deleted, \
                               deleted_at";

/// Repository for expense database operations.
pub struct ExpenseRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ExpenseRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            "INSERT INTO expenses (id, tenant_id, branch_id, category, description, amount_cents,
                                   incurred_on, recorded_by, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&expense.id)
        .bind(&expense.tenant_id)
        .bind(&expense.branch_id)
        .bind(expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.incurred_on)
        .bind(&expense.recorded_by)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_expense_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn list_expenses(
        &self,
        tenant_id: &str,
        categories: Option<&[ExpenseCategory]>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Expense>> {
        let category_list = Self::category_list(categories);
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE tenant_id = ? AND is_deleted = 0
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || category || ',%')
               AND (? IS NULL OR incurred_on >= ?)
               AND (? IS NULL OR incurred_on <= ?)
             ORDER BY incurred_on DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(tenant_id)
        .bind(&category_list)
        .bind(&category_list)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn count_expenses(
        &self,
        tenant_id: &str,
        categories: Option<&[ExpenseCategory]>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<u64> {
        let category_list = Self::category_list(categories);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM expenses
             WHERE tenant_id = ? AND is_deleted = 0
               AND (? IS NULL OR ',' || ? || ',' LIKE '%,' || category || ',%')
               AND (? IS NULL OR incurred_on >= ?)
               AND (? IS NULL OR incurred_on <= ?)",
        )
        .bind(tenant_id)
        .bind(&category_list)
        .bind(&category_list)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    pub async fn soft_delete_expense(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE expenses SET is_deleted = 1, deleted_at = ?, updated_at = ?
             WHERE id = ? AND tenant_id = ? AND is_deleted = 0",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .bind(tenant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn category_list(categories: Option<&[ExpenseCategory]>) -> Option<String> {
        categories.map(|categories| {
            categories
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}
