//! Handler functions for credit account API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{
    CreateCreditAccount, CreateCreditPayment, CreditAccount, CreditPayment, UpdateCreditLimit,
};
use crate::services::credit_service::CreditService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Opens a credit account for a customer.
#[axum::debug_handler]
pub async fn create_credit_account(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateCreditAccount>,
) -> Result<ResponseJson<ApiResponse<CreditAccount>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.create_account(payload).await {
        Ok(account) => Ok(ResponseJson(ApiResponse::success(
            account,
            "Credit account created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a credit account by id.
#[axum::debug_handler]
pub async fn get_credit_account(
    Extension(pool): Extension<SqlitePool>,
    Path(account_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<CreditAccount>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.get_account_required(&account_id).await {
        Ok(account) => Ok(ResponseJson(ApiResponse::success(
            account,
            "Credit account retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists credit accounts for the tenant.
#[axum::debug_handler]
pub async fn list_credit_accounts(
    Extension(pool): Extension<SqlitePool>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<CreditAccount>>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.list_accounts(&pagination).await {
        Ok(accounts) => Ok(ResponseJson(ApiResponse::paginated(
            accounts.items,
            PaginationMeta::from_filter(&pagination, accounts.total),
            "Credit accounts retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Changes the credit limit of an account.
#[axum::debug_handler]
pub async fn update_credit_limit(
    Extension(pool): Extension<SqlitePool>,
    Path(account_id): Path<String>,
    Json(payload): Json<UpdateCreditLimit>,
) -> Result<ResponseJson<ApiResponse<CreditAccount>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.update_credit_limit(&account_id, payload).await {
        Ok(account) => Ok(ResponseJson(ApiResponse::success(
            account,
            "Credit limit updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Closes an account with a zero balance.
#[axum::debug_handler]
pub async fn deactivate_credit_account(
    Extension(pool): Extension<SqlitePool>,
    Path(account_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.deactivate_account(&account_id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Credit account deactivated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Records a repayment against an account's balance.
#[axum::debug_handler]
pub async fn record_credit_payment(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(account_id): Path<String>,
    Json(payload): Json<CreateCreditPayment>,
) -> Result<ResponseJson<ApiResponse<CreditPayment>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service
        .record_payment(&account_id, payload, &principal.user_id)
        .await
    {
        Ok(payment) => Ok(ResponseJson(ApiResponse::success(
            payment,
            "Credit payment recorded successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists repayments made against an account, newest first.
#[axum::debug_handler]
pub async fn list_credit_payments(
    Extension(pool): Extension<SqlitePool>,
    Path(account_id): Path<String>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<CreditPayment>>>, (StatusCode, String)> {
    let service = CreditService::new(&pool);
    match service.list_payments(&account_id, &pagination).await {
        Ok(payments) => Ok(ResponseJson(ApiResponse::paginated(
            payments.items,
            PaginationMeta::from_filter(&pagination, payments.total),
            "Credit payments retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
