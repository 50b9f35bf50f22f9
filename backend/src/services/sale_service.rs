//! Point-of-sale business logic: checkout and voiding.
//!
//! Checkout prices every line from the catalog, deducts stock under the
//! SQL guard and settles payment, all in one transaction. The client
//! reference makes checkout idempotent: a replayed request returns the
//! stored sale instead of charging or deducting twice.

use crate::api::common::{ListFilter, PaginatedData};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{
    CreateSale, MovementType, PaymentMethod, Sale, SaleItem, SaleStatus, SaleWithItems,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::credit_repository::CreditRepository;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::product_repository::ProductRepository;
use crate::repositories::sale_repository::SaleRepository;
use crate::services::validate_dto;
use crate::utils::money;
use crate::utils::reference;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for sale operations.
pub struct SaleService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> SaleService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Checks out a sale.
    ///
    /// A request replayed with a known client reference returns the stored
    /// sale without touching stock, payment or the ledger again.
    pub async fn create_sale(
        &self,
        payload: CreateSale,
        cashier_id: &str,
    ) -> ServiceResult<SaleWithItems> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let sale_repo = SaleRepository::new(self.pool);
        if let Some(existing) = sale_repo
            .get_sale_by_client_reference(&tenant_id, &payload.client_reference)
            .await?
        {
            tracing::debug!(reference = %payload.client_reference, "replayed checkout");
            let items = sale_repo.get_items(&existing.id).await?;
            return Ok(SaleWithItems {
                sale: existing,
                items,
            });
        }

        if BranchRepository::new(self.pool)
            .get_branch_by_id(&tenant_id, &payload.branch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Branch", &payload.branch_id));
        }

        // Price every line from the catalog; submitted prices are ignored.
        let product_repo = ProductRepository::new(self.pool);
        let sale_id = Uuid::now_v7().to_string();
        let mut items = Vec::with_capacity(payload.items.len());
        let mut subtotal_cents = 0;
        let mut vat_cents = 0;
        for line in &payload.items {
            let product = product_repo
                .get_product_by_id(&tenant_id, &line.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Product", &line.product_id))?;
            if !product.is_active {
                return Err(ServiceError::invalid_operation(format!(
                    "Product {} is not active",
                    product.name
                )));
            }

            let amounts =
                money::line_amounts(product.selling_price_cents, line.quantity, product.vat_rate_bps);
            subtotal_cents += amounts.net_cents;
            vat_cents += amounts.vat_cents;
            items.push(SaleItem {
                id: Uuid::now_v7().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id,
                quantity: line.quantity,
                unit_price_cents: product.selling_price_cents,
                vat_rate_bps: product.vat_rate_bps,
                line_net_cents: amounts.net_cents,
                line_vat_cents: amounts.vat_cents,
                line_total_cents: amounts.total_cents,
            });
        }
        let total_cents = subtotal_cents + vat_cents;

        let (amount_tendered_cents, change_due_cents, credit_account_id) =
            self.settlement_terms(&tenant_id, &payload, total_cents).await?;

        let sale = Sale {
            id: sale_id,
            tenant_id: tenant_id.clone(),
            branch_id: payload.branch_id.clone(),
            receipt_number: reference::receipt_number(),
            client_reference: payload.client_reference.clone(),
            cashier_id: cashier_id.to_string(),
            status: SaleStatus::Completed,
            payment_method: payload.payment_method,
            credit_account_id: credit_account_id.clone(),
            subtotal_cents,
            vat_cents,
            total_cents,
            amount_tendered_cents,
            change_due_cents,
            voided_by: None,
            voided_at: None,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        for item in &items {
            let deducted = InventoryRepository::try_deduct_stock(
                &mut tx,
                &tenant_id,
                &payload.branch_id,
                &item.product_id,
                item.quantity,
            )
            .await?;
            if !deducted {
                tx.rollback().await?;
                return Err(ServiceError::invalid_operation(format!(
                    "Insufficient stock for product {}",
                    item.product_id
                )));
            }
            InventoryRepository::insert_movement(
                &mut tx,
                &tenant_id,
                &payload.branch_id,
                &item.product_id,
                MovementType::Sale,
                -item.quantity,
                &sale.receipt_number,
                cashier_id,
            )
            .await?;
        }

        if let Some(account_id) = &credit_account_id {
            let charged =
                CreditRepository::try_charge(&mut tx, &tenant_id, account_id, total_cents).await?;
            if !charged {
                tx.rollback().await?;
                return Err(ServiceError::invalid_operation(
                    "Charge exceeds the account's credit limit",
                ));
            }
        }

        SaleRepository::insert_sale(&mut tx, &sale).await?;
        for item in &items {
            SaleRepository::insert_item(&mut tx, item).await?;
        }
        tx.commit().await?;

        tracing::info!(receipt = %sale.receipt_number, total = sale.total_cents, "sale completed");

        Ok(SaleWithItems { sale, items })
    }

    /// Voids a completed sale: restocks every line, reverses a credit charge
    /// and stamps the sale voided, atomically.
    pub async fn void_sale(&self, id: &str, voided_by: &str) -> ServiceResult<SaleWithItems> {
        let tenant_id = TenantContext::require()?.to_string();

        let sale_repo = SaleRepository::new(self.pool);
        let sale = sale_repo
            .get_sale_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", id))?;
        let items = sale_repo.get_items(&sale.id).await?;

        let mut tx = self.pool.begin().await?;

        let marked = SaleRepository::mark_voided(&mut tx, &tenant_id, id, voided_by).await?;
        if !marked {
            tx.rollback().await?;
            return Err(ServiceError::invalid_operation("Sale is already voided"));
        }

        for item in &items {
            InventoryRepository::add_stock(
                &mut tx,
                &tenant_id,
                &sale.branch_id,
                &item.product_id,
                item.quantity,
            )
            .await?;
            InventoryRepository::insert_movement(
                &mut tx,
                &tenant_id,
                &sale.branch_id,
                &item.product_id,
                MovementType::SaleReversal,
                item.quantity,
                &sale.receipt_number,
                voided_by,
            )
            .await?;
        }

        if let Some(account_id) = &sale.credit_account_id {
            let reduced =
                CreditRepository::try_reduce_balance(&mut tx, &tenant_id, account_id, sale.total_cents)
                    .await?;
            if !reduced {
                tx.rollback().await?;
                return Err(ServiceError::invalid_operation(
                    "Credit balance is lower than the sale total; record the refund separately",
                ));
            }
        }

        tx.commit().await?;

        tracing::info!(receipt = %sale.receipt_number, "sale voided");

        self.get_sale_required(id).await
    }

    pub async fn get_sale_required(&self, id: &str) -> ServiceResult<SaleWithItems> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = SaleRepository::new(self.pool);

        let sale = repo
            .get_sale_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", id))?;
        let items = repo.get_items(&sale.id).await?;

        Ok(SaleWithItems { sale, items })
    }

    pub async fn list_sales(
        &self,
        filter: &ListFilter<SaleStatus>,
    ) -> ServiceResult<PaginatedData<Sale>> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(filter)?;

        let repo = SaleRepository::new(self.pool);
        let statuses = filter.states.as_deref();

        let sales = repo
            .list_sales(&tenant_id, statuses, filter.from, filter.to, &filter.pagination())
            .await?;
        let total = repo
            .count_sales(&tenant_id, statuses, filter.from, filter.to)
            .await?;

        Ok(PaginatedData::new(sales, total))
    }

    /// Resolves tendered amount, change and credit account for the chosen
    /// payment method before the checkout transaction starts.
    async fn settlement_terms(
        &self,
        tenant_id: &str,
        payload: &CreateSale,
        total_cents: i64,
    ) -> ServiceResult<(Option<i64>, Option<i64>, Option<String>)> {
        match payload.payment_method {
            PaymentMethod::Cash => {
                let tendered = payload.amount_tendered_cents.ok_or_else(|| {
                    ServiceError::validation("Cash sales require the amount tendered")
                })?;
                if tendered < total_cents {
                    return Err(ServiceError::invalid_operation(
                        "Amount tendered is less than the sale total",
                    ));
                }
                Ok((Some(tendered), Some(tendered - total_cents), None))
            }
            PaymentMethod::Card => Ok((None, None, None)),
            PaymentMethod::Credit => {
                let account_id = payload.credit_account_id.clone().ok_or_else(|| {
                    ServiceError::validation("Credit sales require a credit account")
                })?;
                // Existence check up front for a clean 404; the limit guard
                // runs inside the transaction.
                CreditRepository::new(self.pool)
                    .get_account_by_id(tenant_id, &account_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Credit account", &account_id))?;
                Ok((None, None, Some(account_id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::PaginationFilter;
    use crate::database::models::{CreateCreditAccount, CreateSaleItem, StockAdjustment};
    use crate::database::test_support::{SeededTenant, seed_tenant, test_pool};
    use crate::services::credit_service::CreditService;
    use crate::services::inventory_service::InventoryService;
    use crate::services::product_service::{ProductService, tests::paracetamol};

    /// Creates the fixture product and stocks `quantity` of it in the
    /// seeded branch. Returns the product id.
    async fn stocked_product(pool: &SqlitePool, seeded: &SeededTenant, quantity: i64) -> String {
        let product = ProductService::new(pool)
            .create_product(paracetamol())
            .await
            .unwrap();
        InventoryService::new(pool)
            .adjust_stock(
                StockAdjustment {
                    branch_id: seeded.branch_id.clone(),
                    product_id: product.id.clone(),
                    quantity_change: quantity,
                    reason: "opening stock".to_string(),
                },
                &seeded.user_id,
            )
            .await
            .unwrap();
        product.id
    }

    fn cash_sale(seeded: &SeededTenant, product_id: &str, reference: &str) -> CreateSale {
        CreateSale {
            branch_id: seeded.branch_id.clone(),
            client_reference: reference.to_string(),
            payment_method: PaymentMethod::Cash,
            credit_account_id: None,
            amount_tendered_cents: Some(10_000),
            items: vec![CreateSaleItem {
                product_id: product_id.to_string(),
                quantity: 3,
            }],
        }
    }

    #[tokio::test]
    async fn cash_checkout_prices_deducts_and_gives_change() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;

            let sold = SaleService::new(&pool)
                .create_sale(cash_sale(&seeded, &product_id, "till-1-0001"), &seeded.user_id)
                .await
                .unwrap();

            // 3 x 250 = 750 net, 7.5% VAT = 56 (half-up on 56.25 rounds down).
            assert_eq!(sold.sale.subtotal_cents, 750);
            assert_eq!(sold.sale.vat_cents, 56);
            assert_eq!(sold.sale.total_cents, 806);
            assert_eq!(sold.sale.change_due_cents, Some(10_000 - 806));
            assert_eq!(sold.sale.status, SaleStatus::Completed);
            assert!(sold.sale.receipt_number.starts_with("RCT-"));

            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 17);
        })
        .await;
    }

    #[tokio::test]
    async fn replayed_client_reference_returns_the_stored_sale() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;
            let service = SaleService::new(&pool);

            let first = service
                .create_sale(cash_sale(&seeded, &product_id, "till-1-0001"), &seeded.user_id)
                .await
                .unwrap();
            let replay = service
                .create_sale(cash_sale(&seeded, &product_id, "till-1-0001"), &seeded.user_id)
                .await
                .unwrap();

            assert_eq!(replay.sale.id, first.sale.id);
            assert_eq!(replay.sale.receipt_number, first.sale.receipt_number);

            // Stock deducted exactly once.
            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 17);
        })
        .await;
    }

    #[tokio::test]
    async fn insufficient_stock_rolls_the_checkout_back() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 2).await;
            let service = SaleService::new(&pool);

            assert!(matches!(
                service
                    .create_sale(cash_sale(&seeded, &product_id, "till-1-0001"), &seeded.user_id)
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));

            // Nothing committed: level unchanged, no sale ledger entry.
            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 2);
            let movements = InventoryService::new(&pool)
                .list_movements(&seeded.branch_id, &PaginationFilter::default())
                .await
                .unwrap();
            assert_eq!(movements.total, 1); // the opening adjustment only
        })
        .await;
    }

    #[tokio::test]
    async fn cash_sale_with_short_tender_is_refused() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;

            let mut payload = cash_sale(&seeded, &product_id, "till-1-0001");
            payload.amount_tendered_cents = Some(800); // total is 806
            assert!(matches!(
                SaleService::new(&pool)
                    .create_sale(payload, &seeded.user_id)
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn credit_checkout_charges_the_account_within_its_limit() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;
            let account = CreditService::new(&pool)
                .create_account(CreateCreditAccount {
                    customer_name: "Mrs. Okoro".to_string(),
                    phone: "0801112222".to_string(),
                    credit_limit_cents: 1_000,
                })
                .await
                .unwrap();

            let mut payload = cash_sale(&seeded, &product_id, "till-1-0001");
            payload.payment_method = PaymentMethod::Credit;
            payload.credit_account_id = Some(account.id.clone());
            payload.amount_tendered_cents = None;

            let service = SaleService::new(&pool);
            let sold = service.create_sale(payload.clone(), &seeded.user_id).await.unwrap();
            assert_eq!(sold.sale.total_cents, 806);

            let account = CreditService::new(&pool)
                .get_account_required(&account.id)
                .await
                .unwrap();
            assert_eq!(account.balance_cents, 806);

            // A second charge would cross the 1000-cent limit.
            payload.client_reference = "till-1-0002".to_string();
            assert!(matches!(
                service.create_sale(payload, &seeded.user_id).await,
                Err(ServiceError::InvalidOperation { .. })
            ));
            let account = CreditService::new(&pool)
                .get_account_required(&account.id)
                .await
                .unwrap();
            assert_eq!(account.balance_cents, 806);
        })
        .await;
    }

    #[tokio::test]
    async fn credit_sale_without_an_account_fails_validation() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;

            let mut payload = cash_sale(&seeded, &product_id, "till-1-0001");
            payload.payment_method = PaymentMethod::Credit;
            assert!(matches!(
                SaleService::new(&pool)
                    .create_sale(payload, &seeded.user_id)
                    .await,
                Err(ServiceError::Validation { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn voiding_restocks_and_reverses_the_credit_charge() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;
            let account = CreditService::new(&pool)
                .create_account(CreateCreditAccount {
                    customer_name: "Mrs. Okoro".to_string(),
                    phone: "0801112222".to_string(),
                    credit_limit_cents: 10_000,
                })
                .await
                .unwrap();

            let mut payload = cash_sale(&seeded, &product_id, "till-1-0001");
            payload.payment_method = PaymentMethod::Credit;
            payload.credit_account_id = Some(account.id.clone());
            payload.amount_tendered_cents = None;

            let service = SaleService::new(&pool);
            let sold = service.create_sale(payload, &seeded.user_id).await.unwrap();

            let voided = service.void_sale(&sold.sale.id, &seeded.user_id).await.unwrap();
            assert_eq!(voided.sale.status, SaleStatus::Voided);
            assert_eq!(voided.sale.voided_by.as_deref(), Some(seeded.user_id.as_str()));

            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 20);

            let account = CreditService::new(&pool)
                .get_account_required(&account.id)
                .await
                .unwrap();
            assert_eq!(account.balance_cents, 0);

            // Voiding twice is refused.
            assert!(matches!(
                service.void_sale(&sold.sale.id, &seeded.user_id).await,
                Err(ServiceError::InvalidOperation { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn listing_filters_by_status_and_date() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let product_id = stocked_product(&pool, &seeded, 20).await;
            let service = SaleService::new(&pool);

            let first = service
                .create_sale(cash_sale(&seeded, &product_id, "till-1-0001"), &seeded.user_id)
                .await
                .unwrap();
            service
                .create_sale(cash_sale(&seeded, &product_id, "till-1-0002"), &seeded.user_id)
                .await
                .unwrap();
            service.void_sale(&first.sale.id, &seeded.user_id).await.unwrap();

            let completed = service
                .list_sales(&ListFilter {
                    page: None,
                    per_page: None,
                    from: None,
                    to: None,
                    states: Some(vec![SaleStatus::Completed]),
                })
                .await
                .unwrap();
            assert_eq!(completed.total, 1);

            let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
            let future = service
                .list_sales(&ListFilter {
                    page: None,
                    per_page: None,
                    from: Some(tomorrow),
                    to: None,
                    states: None,
                })
                .await
                .unwrap();
            assert_eq!(future.total, 0);
        })
        .await;
    }
}
