//! Supplier management business logic.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{CreateSupplier, Supplier, UpdateSupplier};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::supplier_repository::SupplierRepository;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for supplier operations.
pub struct SupplierService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> SupplierService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_supplier(&self, payload: CreateSupplier) -> ServiceResult<Supplier> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let repo = SupplierRepository::new(self.pool);
        if repo.supplier_name_exists(&tenant_id, &payload.name).await? {
            return Err(ServiceError::already_exists("Supplier", &payload.name));
        }

        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            name: payload.name,
            contact_person: payload.contact_person,
            phone: payload.phone,
            email: payload.email,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        repo.create_supplier(&supplier).await?;

        Ok(supplier)
    }

    pub async fn get_supplier_required(&self, id: &str) -> ServiceResult<Supplier> {
        let tenant_id = TenantContext::require()?.to_string();

        SupplierRepository::new(self.pool)
            .get_supplier_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))
    }

    pub async fn list_suppliers(
        &self,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<Supplier>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = SupplierRepository::new(self.pool);

        let suppliers = repo.list_suppliers(&tenant_id, pagination).await?;
        let total = repo.count_suppliers(&tenant_id).await?;

        Ok(PaginatedData::new(suppliers, total))
    }

    pub async fn update_supplier(
        &self,
        id: &str,
        payload: UpdateSupplier,
    ) -> ServiceResult<Supplier> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if !SupplierRepository::new(self.pool)
            .update_supplier(
                &tenant_id,
                id,
                payload.name.as_deref(),
                payload.contact_person.as_deref(),
                payload.phone.as_deref(),
                payload.email.as_deref(),
            )
            .await?
        {
            return Err(ServiceError::not_found("Supplier", id));
        }

        self.get_supplier_required(id).await
    }

    pub async fn deactivate_supplier(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        if !SupplierRepository::new(self.pool)
            .deactivate_supplier(&tenant_id, id)
            .await?
        {
            return Err(ServiceError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::test_support::{seed_tenant, test_pool};

    pub(crate) fn acme_pharma() -> CreateSupplier {
        CreateSupplier {
            name: "Acme Pharma Distribution".to_string(),
            contact_person: Some("Bola".to_string()),
            phone: Some("0803334444".to_string()),
            email: Some("orders@acmepharma.example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn supplier_lifecycle() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = SupplierService::new(&pool);

            let supplier = service.create_supplier(acme_pharma()).await.unwrap();

            assert!(matches!(
                service.create_supplier(acme_pharma()).await,
                Err(ServiceError::AlreadyExists { .. })
            ));

            let updated = service
                .update_supplier(
                    &supplier.id,
                    UpdateSupplier {
                        name: None,
                        contact_person: Some("Chidi".to_string()),
                        phone: None,
                        email: None,
                    },
                )
                .await
                .unwrap();
            assert_eq!(updated.contact_person.as_deref(), Some("Chidi"));

            service.deactivate_supplier(&supplier.id).await.unwrap();
            let reloaded = service.get_supplier_required(&supplier.id).await.unwrap();
            assert!(!reloaded.is_active);

            let listed = service
                .list_suppliers(&PaginationFilter::default())
                .await
                .unwrap();
            assert_eq!(listed.total, 1);
        })
        .await;
    }
}
