//! Handler functions for expense API endpoints.

use crate::api::common::{ApiResponse, ListFilter, PaginationMeta, service_error_to_http};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{CreateExpense, Expense, ExpenseCategory};
use crate::services::expense_service::ExpenseService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Records an operating expense against a branch.
#[axum::debug_handler]
pub async fn create_expense(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<CreateExpense>,
) -> Result<ResponseJson<ApiResponse<Expense>>, (StatusCode, String)> {
    let service = ExpenseService::new(&pool);
    match service.create_expense(payload, &principal.user_id).await {
        Ok(expense) => Ok(ResponseJson(ApiResponse::success(
            expense,
            "Expense recorded successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves an expense by id.
#[axum::debug_handler]
pub async fn get_expense(
    Extension(pool): Extension<SqlitePool>,
    Path(expense_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Expense>>, (StatusCode, String)> {
    let service = ExpenseService::new(&pool);
    match service.get_expense_required(&expense_id).await {
        Ok(expense) => Ok(ResponseJson(ApiResponse::success(
            expense,
            "Expense retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists expenses, optionally filtered by category and date range.
#[axum::debug_handler]
pub async fn list_expenses(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<ListFilter<ExpenseCategory>>,
) -> Result<ResponseJson<ApiResponse<Vec<Expense>>>, (StatusCode, String)> {
    let service = ExpenseService::new(&pool);
    match service.list_expenses(&filter).await {
        Ok(expenses) => Ok(ResponseJson(ApiResponse::paginated(
            expenses.items,
            PaginationMeta::from_filter(&filter.pagination(), expenses.total),
            "Expenses retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Soft-deletes an expense record.
#[axum::debug_handler]
pub async fn delete_expense(
    Extension(pool): Extension<SqlitePool>,
    Path(expense_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = ExpenseService::new(&pool);
    match service.delete_expense(&expense_id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Expense deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
