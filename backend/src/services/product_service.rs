//! Product catalog business logic.

use crate::api::common::{PaginatedData, SearchFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{CreateProduct, Product, UpdateProduct};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::product_repository::ProductRepository;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for catalog operations.
pub struct ProductService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProductService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_product(&self, payload: CreateProduct) -> ServiceResult<Product> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let repo = ProductRepository::new(self.pool);
        if repo.sku_exists(&tenant_id, &payload.sku).await? {
            return Err(ServiceError::already_exists("Product", &payload.sku));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            sku: payload.sku,
            name: payload.name,
            generic_name: payload.generic_name,
            category: payload.category,
            unit: payload.unit,
            cost_price_cents: payload.cost_price_cents,
            selling_price_cents: payload.selling_price_cents,
            vat_rate_bps: payload.vat_rate_bps,
            reorder_level: payload.reorder_level,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        repo.create_product(&product).await?;

        Ok(product)
    }

    pub async fn get_product_required(&self, id: &str) -> ServiceResult<Product> {
        let tenant_id = TenantContext::require()?.to_string();

        ProductRepository::new(self.pool)
            .get_product_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn list_products(
        &self,
        filter: &SearchFilter,
    ) -> ServiceResult<PaginatedData<Product>> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(filter)?;

        let repo = ProductRepository::new(self.pool);
        let search = filter.q.as_deref();

        let products = repo
            .list_products(&tenant_id, search, &filter.pagination())
            .await?;
        let total = repo.count_products(&tenant_id, search).await?;

        Ok(PaginatedData::new(products, total))
    }

    pub async fn update_product(&self, id: &str, payload: UpdateProduct) -> ServiceResult<Product> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if !ProductRepository::new(self.pool)
            .update_product(
                &tenant_id,
                id,
                payload.name.as_deref(),
                payload.generic_name.as_deref(),
                payload.category.as_deref(),
                payload.unit.as_deref(),
                payload.cost_price_cents,
                payload.selling_price_cents,
                payload.vat_rate_bps,
                payload.reorder_level,
            )
            .await?
        {
            return Err(ServiceError::not_found("Product", id));
        }

        self.get_product_required(id).await
    }

    pub async fn deactivate_product(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        if !ProductRepository::new(self.pool)
            .deactivate_product(&tenant_id, id)
            .await?
        {
            return Err(ServiceError::not_found("Product", id));
        }

        Ok(())
    }
}
