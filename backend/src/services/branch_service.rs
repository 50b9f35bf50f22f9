//! Branch administration business logic.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{Branch, CreateBranch, UpdateBranch};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for branch operations.
pub struct BranchService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> BranchService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_branch(&self, payload: CreateBranch) -> ServiceResult<Branch> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let repo = BranchRepository::new(self.pool);
        if repo.branch_name_exists(&tenant_id, &payload.name).await? {
            return Err(ServiceError::already_exists("Branch", &payload.name));
        }

        let now = Utc::now();
        let branch = Branch {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            name: payload.name,
            address: payload.address,
            phone: payload.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        repo.create_branch(&branch).await?;

        Ok(branch)
    }

    pub async fn get_branch_required(&self, id: &str) -> ServiceResult<Branch> {
        let tenant_id = TenantContext::require()?.to_string();

        BranchRepository::new(self.pool)
            .get_branch_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Branch", id))
    }

    pub async fn list_branches(
        &self,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<Branch>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = BranchRepository::new(self.pool);

        let branches = repo.list_branches(&tenant_id, pagination).await?;
        let total = repo.count_branches(&tenant_id).await?;

        Ok(PaginatedData::new(branches, total))
    }

    pub async fn update_branch(&self, id: &str, payload: UpdateBranch) -> ServiceResult<Branch> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let repo = BranchRepository::new(self.pool);
        if let Some(name) = payload.name.as_deref() {
            let current = repo
                .get_branch_by_id(&tenant_id, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Branch", id))?;
            if name != current.name && repo.branch_name_exists(&tenant_id, name).await? {
                return Err(ServiceError::already_exists("Branch", name));
            }
        }

        if !repo
            .update_branch(
                &tenant_id,
                id,
                payload.name.as_deref(),
                payload.address.as_deref(),
                payload.phone.as_deref(),
            )
            .await?
        {
            return Err(ServiceError::not_found("Branch", id));
        }

        self.get_branch_required(id).await
    }

    pub async fn deactivate_branch(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        if !BranchRepository::new(self.pool)
            .deactivate_branch(&tenant_id, id)
            .await?
        {
            return Err(ServiceError::not_found("Branch", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_tenant, test_pool};

    #[tokio::test]
    async fn create_update_and_deactivate_branch() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = BranchService::new(&pool);

            let branch = service
                .create_branch(CreateBranch {
                    name: "Airport Road".to_string(),
                    address: "2 Airport Road".to_string(),
                    phone: None,
                })
                .await
                .unwrap();

            let updated = service
                .update_branch(
                    &branch.id,
                    UpdateBranch {
                        name: None,
                        address: Some("4 Airport Road".to_string()),
                        phone: Some("0809990000".to_string()),
                    },
                )
                .await
                .unwrap();
            assert_eq!(updated.name, "Airport Road");
            assert_eq!(updated.address, "4 Airport Road");

            service.deactivate_branch(&branch.id).await.unwrap();
            let reloaded = service.get_branch_required(&branch.id).await.unwrap();
            assert!(!reloaded.is_active);

            // Seeded "Main Branch" plus the new one.
            let listed = service
                .list_branches(&PaginationFilter::default())
                .await
                .unwrap();
            assert_eq!(listed.total, 2);
        })
        .await;
    }

    #[tokio::test]
    async fn duplicate_branch_name_within_tenant_is_rejected() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = BranchService::new(&pool);

            assert!(matches!(
                service
                    .create_branch(CreateBranch {
                        name: "Main Branch".to_string(),
                        address: "somewhere".to_string(),
                        phone: None,
                    })
                    .await,
                Err(ServiceError::AlreadyExists { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn same_branch_name_is_allowed_across_tenants() {
        let pool = test_pool().await;
        let first = seed_tenant(&pool, "greenleaf").await;
        let second = seed_tenant(&pool, "bluecross").await;

        for seeded in [&first, &second] {
            let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();
            TenantContext::scope(async {
                TenantContext::set(tenant);
                BranchService::new(&pool)
                    .create_branch(CreateBranch {
                        name: "Airport Road".to_string(),
                        address: "2 Airport Road".to_string(),
                        phone: None,
                    })
                    .await
                    .unwrap();
            })
            .await;
        }
    }
}
