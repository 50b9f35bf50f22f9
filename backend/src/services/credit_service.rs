//! Customer credit account business logic.
//!
//! Charges happen during checkout in the sale service; this service owns
//! account administration and repayments.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{
    CreateCreditAccount, CreateCreditPayment, CreditAccount, CreditPayment, PaymentMethod,
    UpdateCreditLimit,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::credit_repository::CreditRepository;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for credit account operations.
pub struct CreditService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> CreditService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_account(
        &self,
        payload: CreateCreditAccount,
    ) -> ServiceResult<CreditAccount> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let repo = CreditRepository::new(self.pool);
        if repo.phone_exists(&tenant_id, &payload.phone).await? {
            return Err(ServiceError::already_exists("Credit account", &payload.phone));
        }

        let now = Utc::now();
        let account = CreditAccount {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            customer_name: payload.customer_name,
            phone: payload.phone,
            credit_limit_cents: payload.credit_limit_cents,
            balance_cents: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        repo.create_account(&account).await?;

        Ok(account)
    }

    pub async fn get_account_required(&self, id: &str) -> ServiceResult<CreditAccount> {
        let tenant_id = TenantContext::require()?.to_string();

        CreditRepository::new(self.pool)
            .get_account_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Credit account", id))
    }

    pub async fn list_accounts(
        &self,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<CreditAccount>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = CreditRepository::new(self.pool);

        let accounts = repo.list_accounts(&tenant_id, pagination).await?;
        let total = repo.count_accounts(&tenant_id).await?;

        Ok(PaginatedData::new(accounts, total))
    }

    /// Raises or lowers the limit. An existing balance above a lowered limit
    /// stays as is; it only blocks further charges.
    pub async fn update_credit_limit(
        &self,
        id: &str,
        payload: UpdateCreditLimit,
    ) -> ServiceResult<CreditAccount> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if !CreditRepository::new(self.pool)
            .update_credit_limit(&tenant_id, id, payload.credit_limit_cents)
            .await?
        {
            return Err(ServiceError::not_found("Credit account", id));
        }

        self.get_account_required(id).await
    }

    /// Deactivation requires a settled balance.
    pub async fn deactivate_account(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        let repo = CreditRepository::new(self.pool);
        if repo.deactivate_if_settled(&tenant_id, id).await? {
            return Ok(());
        }

        match repo.get_account_by_id(&tenant_id, id).await? {
            Some(_) => Err(ServiceError::invalid_operation(
                "Account has an outstanding balance",
            )),
            None => Err(ServiceError::not_found("Credit account", id)),
        }
    }

    /// Records a repayment against the outstanding balance.
    ///
    /// # Errors
    /// Overpayment is refused: the amount may not exceed the balance.
    pub async fn record_payment(
        &self,
        account_id: &str,
        payload: CreateCreditPayment,
        recorded_by: &str,
    ) -> ServiceResult<CreditPayment> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if payload.method == PaymentMethod::Credit {
            return Err(ServiceError::validation(
                "A repayment cannot itself be on credit",
            ));
        }

        self.get_account_required(account_id).await?;

        let payment = CreditPayment {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.clone(),
            credit_account_id: account_id.to_string(),
            amount_cents: payload.amount_cents,
            method: payload.method,
            reference: payload.reference,
            recorded_by: recorded_by.to_string(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        let reduced = CreditRepository::try_reduce_balance(
            &mut tx,
            &tenant_id,
            account_id,
            payload.amount_cents,
        )
        .await?;
        if !reduced {
            tx.rollback().await?;
            return Err(ServiceError::invalid_operation(
                "Payment exceeds the outstanding balance",
            ));
        }
        CreditRepository::insert_payment(&mut tx, &payment).await?;
        tx.commit().await?;

        tracing::info!(account = %account_id, amount = payload.amount_cents, "credit repayment recorded");

        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        account_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<CreditPayment>> {
        let tenant_id = TenantContext::require()?.to_string();

        self.get_account_required(account_id).await?;

        let repo = CreditRepository::new(self.pool);
        let payments = repo.list_payments(&tenant_id, account_id, pagination).await?;
        let total = repo.count_payments(&tenant_id, account_id).await?;

        Ok(PaginatedData::new(payments, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_tenant, test_pool};

    fn account_payload() -> CreateCreditAccount {
        CreateCreditAccount {
            customer_name: "Mrs. Okoro".to_string(),
            phone: "0801112222".to_string(),
            credit_limit_cents: 50_000,
        }
    }

    async fn charge(pool: &SqlitePool, tenant_id: &str, account_id: &str, amount: i64) {
        let mut tx = pool.begin().await.unwrap();
        assert!(
            CreditRepository::try_charge(&mut tx, tenant_id, account_id, amount)
                .await
                .unwrap()
        );
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn account_lifecycle_and_duplicate_phone() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = CreditService::new(&pool);

            let account = service.create_account(account_payload()).await.unwrap();
            assert_eq!(account.balance_cents, 0);

            assert!(matches!(
                service.create_account(account_payload()).await,
                Err(ServiceError::AlreadyExists { .. })
            ));

            let updated = service
                .update_credit_limit(&account.id, UpdateCreditLimit { credit_limit_cents: 80_000 })
                .await
                .unwrap();
            assert_eq!(updated.credit_limit_cents, 80_000);

            service.deactivate_account(&account.id).await.unwrap();
            assert!(!service.get_account_required(&account.id).await.unwrap().is_active);
        })
        .await;
    }

    #[tokio::test]
    async fn repayment_reduces_balance_and_refuses_overpayment() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = CreditService::new(&pool);

            let account = service.create_account(account_payload()).await.unwrap();
            charge(&pool, &seeded.tenant_id, &account.id, 30_000).await;

            let payment = service
                .record_payment(
                    &account.id,
                    CreateCreditPayment {
                        amount_cents: 20_000,
                        method: PaymentMethod::Cash,
                        reference: None,
                    },
                    &seeded.user_id,
                )
                .await
                .unwrap();
            assert_eq!(payment.amount_cents, 20_000);

            let account_now = service.get_account_required(&account.id).await.unwrap();
            assert_eq!(account_now.balance_cents, 10_000);

            // 10_001 > 10_000 outstanding.
            assert!(matches!(
                service
                    .record_payment(
                        &account.id,
                        CreateCreditPayment {
                            amount_cents: 10_001,
                            method: PaymentMethod::Cash,
                            reference: None,
                        },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));

            // Refused payment leaves no history row.
            let payments = service
                .list_payments(&account.id, &PaginationFilter::default())
                .await
                .unwrap();
            assert_eq!(payments.total, 1);
        })
        .await;
    }

    #[tokio::test]
    async fn unsettled_account_cannot_be_deactivated() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = CreditService::new(&pool);

            let account = service.create_account(account_payload()).await.unwrap();
            charge(&pool, &seeded.tenant_id, &account.id, 5_000).await;

            assert!(matches!(
                service.deactivate_account(&account.id).await,
                Err(ServiceError::InvalidOperation { .. })
            ));

            service
                .record_payment(
                    &account.id,
                    CreateCreditPayment {
                        amount_cents: 5_000,
                        method: PaymentMethod::Card,
                        reference: Some("POS-1234".to_string()),
                    },
                    &seeded.user_id,
                )
                .await
                .unwrap();
            service.deactivate_account(&account.id).await.unwrap();
        })
        .await;
    }

    #[tokio::test]
    async fn repayment_on_credit_is_rejected() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = CreditService::new(&pool);
            let account = service.create_account(account_payload()).await.unwrap();

            assert!(matches!(
                service
                    .record_payment(
                        &account.id,
                        CreateCreditPayment {
                            amount_cents: 100,
                            method: PaymentMethod::Credit,
                            reference: None,
                        },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::Validation { .. })
            ));
        })
        .await;
    }
}
