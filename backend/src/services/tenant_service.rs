//! Tenant administration business logic.
//!
//! Onboarding is the one public mutation in the system: it creates the
//! tenant, its first branch and its admin user in a single transaction.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{Branch, CreateTenant, Tenant, TenantOnboarding, User, UserRole};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::tenant_repository::TenantRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::services::validate_dto;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service layer for tenant operations.
pub struct TenantService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> TenantService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Onboards a new pharmacy: tenant, "Main Branch" and admin user are
    /// created atomically.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures and duplicate tenant
    /// names, usernames or emails.
    pub async fn onboard_tenant(&self, payload: CreateTenant) -> ServiceResult<TenantOnboarding> {
        validate_dto(&payload)?;

        let tenant_repo = TenantRepository::new(self.pool);
        if tenant_repo.tenant_name_exists(&payload.name).await? {
            return Err(ServiceError::already_exists("Tenant", &payload.name));
        }

        let user_repo = UserRepository::new(self.pool);
        if user_repo.username_exists(&payload.username).await? {
            return Err(ServiceError::already_exists("User", &payload.username));
        }
        if user_repo.email_exists(&payload.email).await? {
            return Err(ServiceError::already_exists("User", &payload.email));
        }

        let password_hash = UserService::hash_password(&payload.password)?;
        let now = Utc::now();

        let tenant = Tenant {
            id: Uuid::now_v7().to_string(),
            name: payload.name,
            contact_email: payload.contact_email,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        let branch = Branch {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant.id.clone(),
            name: "Main Branch".to_string(),
            address: payload.address,
            phone: payload.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        let admin = User {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant.id.clone(),
            branch_id: branch.id.clone(),
            username: payload.username,
            email: payload.email,
            password_hash,
            role: UserRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        let mut tx = self.pool.begin().await?;
        TenantRepository::insert_tenant(&mut tx, &tenant).await?;
        BranchRepository::insert_branch(&mut tx, &branch).await?;
        UserRepository::insert_user(&mut tx, &admin).await?;
        tx.commit().await?;

        tracing::info!(tenant = %tenant.name, "tenant onboarded");

        Ok(TenantOnboarding {
            tenant,
            branch,
            admin,
        })
    }

    /// The tenant of the current request.
    pub async fn get_current_tenant(&self) -> ServiceResult<Tenant> {
        let tenant_id = TenantContext::require()?.to_string();

        TenantRepository::new(self.pool)
            .get_tenant_by_id(&tenant_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tenant", &tenant_id))
    }

    pub async fn get_tenant_users(
        &self,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<User>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = UserRepository::new(self.pool);

        let users = repo.list_users(&tenant_id, pagination).await?;
        let total = repo.count_users(&tenant_id).await?;

        Ok(PaginatedData::new(users, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::test_pool;

    fn onboarding_payload(name: &str) -> CreateTenant {
        CreateTenant {
            name: name.to_string(),
            contact_email: format!("{name}@example.com"),
            address: "12 Market Road".to_string(),
            phone: Some("0801234567".to_string()),
            username: format!("{name}-admin"),
            email: format!("{name}-admin@example.com"),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn onboarding_creates_tenant_branch_and_admin() {
        let pool = test_pool().await;
        let service = TenantService::new(&pool);

        let onboarded = service
            .onboard_tenant(onboarding_payload("greenleaf"))
            .await
            .unwrap();

        assert_eq!(onboarded.branch.name, "Main Branch");
        assert_eq!(onboarded.branch.tenant_id, onboarded.tenant.id);
        assert_eq!(onboarded.admin.tenant_id, onboarded.tenant.id);
        assert_eq!(onboarded.admin.role, UserRole::Admin);

        // The stored credential must verify against the submitted password.
        let stored = UserRepository::new(&pool)
            .get_user_by_username("greenleaf-admin")
            .await
            .unwrap()
            .unwrap();
        assert!(bcrypt::verify("correct horse battery", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_tenant_name_is_rejected() {
        let pool = test_pool().await;
        let service = TenantService::new(&pool);

        service
            .onboard_tenant(onboarding_payload("greenleaf"))
            .await
            .unwrap();

        let mut second = onboarding_payload("greenleaf");
        second.username = "other-admin".to_string();
        second.email = "other-admin@example.com".to_string();

        assert!(matches!(
            service.onboard_tenant(second).await,
            Err(ServiceError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = test_pool().await;
        let service = TenantService::new(&pool);

        service
            .onboard_tenant(onboarding_payload("greenleaf"))
            .await
            .unwrap();

        let mut second = onboarding_payload("bluecross");
        second.username = "greenleaf-admin".to_string();

        assert!(matches!(
            service.onboard_tenant(second).await,
            Err(ServiceError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn tenant_queries_refuse_to_run_without_context() {
        let pool = test_pool().await;
        let service = TenantService::new(&pool);

        assert!(matches!(
            service.get_current_tenant().await,
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert!(matches!(
            service.get_tenant_users(&PaginationFilter::default()).await,
            Err(ServiceError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn tenant_users_are_scoped_to_the_context_tenant() {
        let pool = test_pool().await;
        let service = TenantService::new(&pool);

        let first = service
            .onboard_tenant(onboarding_payload("greenleaf"))
            .await
            .unwrap();
        service
            .onboard_tenant(onboarding_payload("bluecross"))
            .await
            .unwrap();

        let tenant = Uuid::parse_str(&first.tenant.id).unwrap();
        let users = TenantContext::scope(async {
            TenantContext::set(tenant);
            TenantService::new(&pool)
                .get_tenant_users(&PaginationFilter::default())
                .await
        })
        .await
        .unwrap();

        assert_eq!(users.total, 1);
        assert_eq!(users.items[0].username, "greenleaf-admin");
    }
}
