//! Operating expense business logic.

use crate::api::common::{ListFilter, PaginatedData};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{CreateExpense, Expense, ExpenseCategory};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::expense_repository::ExpenseRepository;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for expense operations.
pub struct ExpenseService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> ExpenseService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_expense(
        &self,
        payload: CreateExpense,
        recorded_by: &str,
    ) -> ServiceResult<Expense> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if BranchRepository::new(self.pool)
            .get_branch_by_id(&tenant_id, &payload.branch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Branch", &payload.branch_id));
        }

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            branch_id: payload.branch_id,
            category: payload.category,
            description: payload.description,
            amount_cents: payload.amount_cents,
            incurred_on: payload.incurred_on,
            recorded_by: recorded_by.to_string(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        ExpenseRepository::new(self.pool)
            .create_expense(&expense)
            .await?;

        Ok(expense)
    }

    pub async fn get_expense_required(&self, id: &str) -> ServiceResult<Expense> {
        let tenant_id = TenantContext::require()?.to_string();

        ExpenseRepository::new(self.pool)
            .get_expense_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Expense", id))
    }

    pub async fn list_expenses(
        &self,
        filter: &ListFilter<ExpenseCategory>,
    ) -> ServiceResult<PaginatedData<Expense>> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(filter)?;

        let repo = ExpenseRepository::new(self.pool);
        let categories = filter.states.as_deref();

        let expenses = repo
            .list_expenses(&tenant_id, categories, filter.from, filter.to, &filter.pagination())
            .await?;
        let total = repo
            .count_expenses(&tenant_id, categories, filter.from, filter.to)
            .await?;

        Ok(PaginatedData::new(expenses, total))
    }

    pub async fn delete_expense(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        if !ExpenseRepository::new(self.pool)
            .soft_delete_expense(&tenant_id, id)
            .await?
        {
            return Err(ServiceError::not_found("Expense", id));
        }

        Ok(())
    }
}
