//! Reporting business logic.
//!
//! Thin orchestration over the aggregate queries: every report is read-only
//! and scoped to the current tenant.

use crate::auth::tenant_context::TenantContext;
use crate::database::models::{FinancialSnapshot, SalesSummary, StockVarianceRow, VatReport};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::report_repository::ReportRepository;
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Service layer for reporting operations.
pub struct ReportService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> ReportService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Totals and payment-method breakdown, optionally for one branch.
    pub async fn sales_summary(
        &self,
        branch_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<SalesSummary> {
        let tenant_id = TenantContext::require()?.to_string();

        if let Some(branch_id) = branch_id {
            self.require_branch(&tenant_id, branch_id).await?;
        }

        let summary = ReportRepository::new(self.pool)
            .sales_summary(&tenant_id, branch_id, from, to)
            .await?;

        Ok(summary)
    }

    /// Taxable base and VAT collected per day, with period totals.
    pub async fn vat_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<VatReport> {
        let tenant_id = TenantContext::require()?.to_string();

        let days = ReportRepository::new(self.pool)
            .vat_by_day(&tenant_id, from, to)
            .await?;
        let total_taxable_cents = days.iter().map(|d| d.taxable_cents).sum();
        let total_vat_cents = days.iter().map(|d| d.vat_cents).sum();

        Ok(VatReport {
            days,
            total_taxable_cents,
            total_vat_cents,
        })
    }

    /// Per-product movement totals for one branch.
    pub async fn stock_variance(
        &self,
        branch_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<Vec<StockVarianceRow>> {
        let tenant_id = TenantContext::require()?.to_string();
        self.require_branch(&tenant_id, branch_id).await?;

        let rows = ReportRepository::new(self.pool)
            .stock_variance(&tenant_id, branch_id, from, to)
            .await?;

        Ok(rows)
    }

    /// Revenue, cost of goods sold and expenses rolled into gross and net
    /// margin for the period.
    pub async fn financial_snapshot(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<FinancialSnapshot> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = ReportRepository::new(self.pool);

        let revenue_cents = repo.revenue(&tenant_id, from, to).await?;
        let cogs_cents = repo.cost_of_goods_sold(&tenant_id, from, to).await?;
        let expenses_cents = repo.expenses_total(&tenant_id, from, to).await?;

        let gross_margin_cents = revenue_cents - cogs_cents;
        Ok(FinancialSnapshot {
            revenue_cents,
            cogs_cents,
            expenses_cents,
            gross_margin_cents,
            net_margin_cents: gross_margin_cents - expenses_cents,
        })
    }

    async fn require_branch(&self, tenant_id: &str, branch_id: &str) -> ServiceResult<()> {
        BranchRepository::new(self.pool)
            .get_branch_by_id(tenant_id, branch_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Branch", branch_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{
        CreateCreditAccount, CreateExpense, CreateSale, CreateSaleItem, ExpenseCategory,
        PaymentMethod, StockAdjustment,
    };
    use crate::database::test_support::{SeededTenant, seed_tenant, test_pool};
    use crate::services::credit_service::CreditService;
    use crate::services::expense_service::ExpenseService;
    use crate::services::inventory_service::InventoryService;
    use crate::services::product_service::{ProductService, tests::paracetamol};
    use crate::services::sale_service::SaleService;
    use chrono::Utc;
    use uuid::Uuid;

    /// Three sales (one voided, one on credit), one expense. The fixture
    /// product sells at 250 with 7.5% VAT and costs 150.
    async fn seed_trading_day(pool: &SqlitePool, seeded: &SeededTenant) -> String {
        let product = ProductService::new(pool)
            .create_product(paracetamol())
            .await
            .unwrap();
        InventoryService::new(pool)
            .adjust_stock(
                StockAdjustment {
                    branch_id: seeded.branch_id.clone(),
                    product_id: product.id.clone(),
                    quantity_change: 100,
                    reason: "opening stock".to_string(),
                },
                &seeded.user_id,
            )
            .await
            .unwrap();

        let account = CreditService::new(pool)
            .create_account(CreateCreditAccount {
                customer_name: "Mrs. Okoro".to_string(),
                phone: "0801112222".to_string(),
                credit_limit_cents: 100_000,
            })
            .await
            .unwrap();

        let sale_service = SaleService::new(pool);
        let sale = |reference: &str, method: PaymentMethod, account_id: Option<String>| CreateSale {
            branch_id: seeded.branch_id.clone(),
            client_reference: reference.to_string(),
            payment_method: method,
            credit_account_id: account_id,
            amount_tendered_cents: matches!(method, PaymentMethod::Cash).then_some(10_000),
            items: vec![CreateSaleItem {
                product_id: product.id.clone(),
                quantity: 2,
            }],
        };

        // Each sale: net 500, VAT 38 (37.5 rounds up), total 538.
        sale_service
            .create_sale(sale("rep-1", PaymentMethod::Cash, None), &seeded.user_id)
            .await
            .unwrap();
        sale_service
            .create_sale(
                sale("rep-2", PaymentMethod::Credit, Some(account.id.clone())),
                &seeded.user_id,
            )
            .await
            .unwrap();
        let voided = sale_service
            .create_sale(sale("rep-3", PaymentMethod::Cash, None), &seeded.user_id)
            .await
            .unwrap();
        sale_service
            .void_sale(&voided.sale.id, &seeded.user_id)
            .await
            .unwrap();

        ExpenseService::new(pool)
            .create_expense(
                CreateExpense {
                    branch_id: seeded.branch_id.clone(),
                    category: ExpenseCategory::Utilities,
                    description: "generator diesel".to_string(),
                    amount_cents: 300,
                    incurred_on: Utc::now().date_naive(),
                },
                &seeded.user_id,
            )
            .await
            .unwrap();

        product.id
    }

    #[tokio::test]
    async fn sales_summary_counts_completed_sales_only() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            seed_trading_day(&pool, &seeded).await;

            let summary = ReportService::new(&pool)
                .sales_summary(Some(&seeded.branch_id), None, None)
                .await
                .unwrap();

            assert_eq!(summary.sale_count, 2);
            assert_eq!(summary.voided_count, 1);
            assert_eq!(summary.net_cents, 1_000);
            assert_eq!(summary.vat_cents, 76);
            assert_eq!(summary.gross_cents, 1_076);
            assert_eq!(summary.cash_cents, 538);
            assert_eq!(summary.credit_cents, 538);
            assert_eq!(summary.card_cents, 0);
        })
        .await;
    }

    #[tokio::test]
    async fn vat_report_totals_match_the_days() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            seed_trading_day(&pool, &seeded).await;

            let report = ReportService::new(&pool).vat_report(None, None).await.unwrap();
            assert_eq!(report.days.len(), 1);
            assert_eq!(report.total_taxable_cents, 1_000);
            assert_eq!(report.total_vat_cents, 76);
            assert_eq!(
                report.days.iter().map(|d| d.vat_cents).sum::<i64>(),
                report.total_vat_cents
            );
        })
        .await;
    }

    #[tokio::test]
    async fn stock_variance_splits_movements_by_type() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = seed_trading_day(&pool, &seeded).await;

            let rows = ReportService::new(&pool)
                .stock_variance(&seeded.branch_id, None, None)
                .await
                .unwrap();
            assert_eq!(rows.len(), 1);
            let row = &rows[0];
            assert_eq!(row.product_id, product_id);
            assert_eq!(row.sold_qty, 6); // three sales of 2, reported positive
            assert_eq!(row.returned_qty, 2); // the voided sale restocked
            assert_eq!(row.adjusted_qty, 100); // opening stock
            assert_eq!(row.received_qty, 0);
        })
        .await;
    }

    #[tokio::test]
    async fn financial_snapshot_rolls_up_margins() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            seed_trading_day(&pool, &seeded).await;

            let snapshot = ReportService::new(&pool)
                .financial_snapshot(None, None)
                .await
                .unwrap();

            // 2 completed sales: revenue 1000, COGS 4 x 150 = 600.
            assert_eq!(snapshot.revenue_cents, 1_000);
            assert_eq!(snapshot.cogs_cents, 600);
            assert_eq!(snapshot.expenses_cents, 300);
            assert_eq!(snapshot.gross_margin_cents, 400);
            assert_eq!(snapshot.net_margin_cents, 100);
        })
        .await;
    }

    #[tokio::test]
    async fn branch_scoped_reports_require_a_known_branch() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = ReportService::new(&pool);

            assert!(matches!(
                service.stock_variance("no-such-branch", None, None).await,
                Err(ServiceError::NotFound { .. })
            ));
            assert!(matches!(
                service.sales_summary(Some("no-such-branch"), None, None).await,
                Err(ServiceError::NotFound { .. })
            ));
            let _ = seeded;
        })
        .await;
    }
}
