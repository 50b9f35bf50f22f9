//! Inventory business logic: stock queries, manual adjustments and the
//! movement ledger.
//!
//! Every stock mutation appends a movement row in the same transaction, so
//! the ledger always replays to the current level.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{
    MovementType, StockAdjustment, StockLevel, StockLevelWithProduct, StockMovement,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::product_repository::ProductRepository;
use crate::services::validate_dto;
use sqlx::SqlitePool;

/// Service layer for inventory operations.
pub struct InventoryService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> InventoryService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_stock_level(
        &self,
        branch_id: &str,
        product_id: &str,
    ) -> ServiceResult<StockLevel> {
        let tenant_id = TenantContext::require()?.to_string();

        InventoryRepository::new(self.pool)
            .get_stock_level(&tenant_id, branch_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Stock level", product_id))
    }

    pub async fn list_branch_stock(
        &self,
        branch_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<StockLevelWithProduct>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = InventoryRepository::new(self.pool);

        let rows = repo
            .list_branch_stock(&tenant_id, branch_id, pagination)
            .await?;
        let total = repo.count_branch_stock(&tenant_id, branch_id).await?;

        Ok(PaginatedData::new(rows, total))
    }

    /// Active products at or below their reorder level in one branch.
    pub async fn list_low_stock(
        &self,
        branch_id: &str,
    ) -> ServiceResult<Vec<StockLevelWithProduct>> {
        let tenant_id = TenantContext::require()?.to_string();

        let rows = InventoryRepository::new(self.pool)
            .list_low_stock(&tenant_id, branch_id)
            .await?;

        Ok(rows)
    }

    pub async fn list_movements(
        &self,
        branch_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<StockMovement>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = InventoryRepository::new(self.pool);

        let movements = repo.list_movements(&tenant_id, branch_id, pagination).await?;
        let total = repo.count_movements(&tenant_id, branch_id).await?;

        Ok(PaginatedData::new(movements, total))
    }

    /// Manually adjusts stock up or down, recording the reason in the ledger.
    ///
    /// # Errors
    /// A downward adjustment larger than the quantity on hand is refused and
    /// leaves both the level and the ledger untouched.
    pub async fn adjust_stock(
        &self,
        payload: StockAdjustment,
        recorded_by: &str,
    ) -> ServiceResult<StockLevel> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if BranchRepository::new(self.pool)
            .get_branch_by_id(&tenant_id, &payload.branch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Branch", &payload.branch_id));
        }
        if ProductRepository::new(self.pool)
            .get_product_by_id(&tenant_id, &payload.product_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Product", &payload.product_id));
        }

        let mut tx = self.pool.begin().await?;

        if payload.quantity_change > 0 {
            InventoryRepository::add_stock(
                &mut tx,
                &tenant_id,
                &payload.branch_id,
                &payload.product_id,
                payload.quantity_change,
            )
            .await?;
        } else {
            let deducted = InventoryRepository::try_deduct_stock(
                &mut tx,
                &tenant_id,
                &payload.branch_id,
                &payload.product_id,
                -payload.quantity_change,
            )
            .await?;
            if !deducted {
                tx.rollback().await?;
                return Err(ServiceError::invalid_operation(
                    "Adjustment would take stock below zero",
                ));
            }
        }

        InventoryRepository::insert_movement(
            &mut tx,
            &tenant_id,
            &payload.branch_id,
            &payload.product_id,
            MovementType::Adjustment,
            payload.quantity_change,
            &payload.reason,
            recorded_by,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            branch = %payload.branch_id,
            product = %payload.product_id,
            change = payload.quantity_change,
            "stock adjusted"
        );

        self.get_stock_level(&payload.branch_id, &payload.product_id)
            .await
    }
}
