//! Handler functions for reporting API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{FinancialSnapshot, SalesSummary, StockVarianceRow, VatReport};
use crate::services::report_service::ReportService;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;

/// Reporting period, both bounds inclusive and both optional.
#[derive(Debug, Deserialize)]
pub struct ReportPeriod {
    pub branch_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Totals for completed and voided sales over a period.
#[axum::debug_handler]
pub async fn sales_summary(
    Extension(pool): Extension<SqlitePool>,
    Query(period): Query<ReportPeriod>,
) -> Result<ResponseJson<ApiResponse<SalesSummary>>, (StatusCode, String)> {
    let service = ReportService::new(&pool);
    match service
        .sales_summary(period.branch_id.as_deref(), period.from, period.to)
        .await
    {
        Ok(summary) => Ok(ResponseJson(ApiResponse::success(
            summary,
            "Sales summary retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Taxable base and VAT collected per day over a period.
#[axum::debug_handler]
pub async fn vat_report(
    Extension(pool): Extension<SqlitePool>,
    Query(period): Query<ReportPeriod>,
) -> Result<ResponseJson<ApiResponse<VatReport>>, (StatusCode, String)> {
    let service = ReportService::new(&pool);
    match service.vat_report(period.from, period.to).await {
        Ok(report) => Ok(ResponseJson(ApiResponse::success(
            report,
            "VAT report retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Per-product movement totals for one branch over a period.
#[axum::debug_handler]
pub async fn stock_variance(
    Extension(pool): Extension<SqlitePool>,
    Path(branch_id): Path<String>,
    Query(period): Query<ReportPeriod>,
) -> Result<ResponseJson<ApiResponse<Vec<StockVarianceRow>>>, (StatusCode, String)> {
    let service = ReportService::new(&pool);
    match service
        .stock_variance(&branch_id, period.from, period.to)
        .await
    {
        Ok(rows) => Ok(ResponseJson(ApiResponse::success(
            rows,
            "Stock variance retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Revenue, cost of goods and expenses rolled into margins.
#[axum::debug_handler]
pub async fn financial_snapshot(
    Extension(pool): Extension<SqlitePool>,
    Query(period): Query<ReportPeriod>,
) -> Result<ResponseJson<ApiResponse<FinancialSnapshot>>, (StatusCode, String)> {
    let service = ReportService::new(&pool);
    match service.financial_snapshot(period.from, period.to).await {
        Ok(snapshot) => Ok(ResponseJson(ApiResponse::success(
            snapshot,
            "Financial snapshot retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
