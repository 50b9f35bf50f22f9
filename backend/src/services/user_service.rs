//! User business logic service.
//!
//! Handles staff user management and credential checks for the login flow.

use crate::api::common::{PaginatedData, PaginationFilter};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{CreateUser, User, UserRole};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::validate_dto;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a staff user in the current tenant.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, an unknown branch,
    /// or a duplicate username/email.
    pub async fn create_user(&self, payload: CreateUser) -> ServiceResult<User> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let branch_repo = BranchRepository::new(self.pool);
        if branch_repo
            .get_branch_by_id(&tenant_id, &payload.branch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Branch", &payload.branch_id));
        }

        let repo = UserRepository::new(self.pool);
        if repo.username_exists(&payload.username).await? {
            return Err(ServiceError::already_exists("User", &payload.username));
        }
        if repo.email_exists(&payload.email).await? {
            return Err(ServiceError::already_exists("User", &payload.email));
        }

        let password_hash = Self::hash_password(&payload.password)?;
        let now = Utc::now();

        let user = User {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            branch_id: payload.branch_id,
            username: payload.username,
            email: payload.email,
            password_hash,
            role: payload.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        repo.create_user(&user).await?;

        Ok(user)
    }

    /// Username/password check for login. All failure modes collapse into
    /// one unauthenticated error so the response never reveals which part
    /// was wrong.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> ServiceResult<User> {
        let user = UserRepository::new(self.pool)
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::unauthenticated("Invalid username or password"))?;

        let matches = verify(password, &user.password_hash)
            .map_err(|e| ServiceError::internal_error(format!("Password check failed: {}", e)))?;
        if !matches {
            return Err(ServiceError::unauthenticated("Invalid username or password"));
        }

        if !user.is_active {
            return Err(ServiceError::unauthenticated("User account is inactive"));
        }

        Ok(user)
    }

    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let tenant_id = TenantContext::require()?.to_string();

        UserRepository::new(self.pool)
            .get_user_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn list_users(
        &self,
        pagination: &PaginationFilter,
    ) -> ServiceResult<PaginatedData<User>> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = UserRepository::new(self.pool);

        let users = repo.list_users(&tenant_id, pagination).await?;
        let total = repo.count_users(&tenant_id).await?;

        Ok(PaginatedData::new(users, total))
    }

    pub async fn change_role(&self, id: &str, role: UserRole) -> ServiceResult<User> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = UserRepository::new(self.pool);

        if !repo.change_role(&tenant_id, id, role).await? {
            return Err(ServiceError::not_found("User", id));
        }

        self.get_user_required(id).await
    }

    pub async fn deactivate_user(&self, id: &str) -> ServiceResult<()> {
        let tenant_id = TenantContext::require()?.to_string();

        if !UserRepository::new(self.pool)
            .deactivate_user(&tenant_id, id)
            .await?
        {
            return Err(ServiceError::not_found("User", id));
        }

        Ok(())
    }

    /// Hashes a password before it is stored.
    pub fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_tenant, test_pool};

    fn create_payload(branch_id: &str, username: &str) -> CreateUser {
        CreateUser {
            branch_id: branch_id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "a sufficiently long password".to_string(),
            role: UserRole::Cashier,
        }
    }

    #[tokio::test]
    async fn create_user_and_authenticate() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        let user = TenantContext::scope(async {
            TenantContext::set(tenant);
            UserService::new(&pool)
                .create_user(create_payload(&seeded.branch_id, "amaka"))
                .await
        })
        .await
        .unwrap();

        assert_eq!(user.role, UserRole::Cashier);
        assert_eq!(user.tenant_id, seeded.tenant_id);

        let service = UserService::new(&pool);
        let authenticated = service
            .authenticate_user("amaka", "a sufficiently long password")
            .await
            .unwrap();
        assert_eq!(authenticated.id, user.id);

        assert!(matches!(
            service.authenticate_user("amaka", "wrong password").await,
            Err(ServiceError::Unauthenticated { .. })
        ));
        assert!(matches!(
            service.authenticate_user("nobody", "anything").await,
            Err(ServiceError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = UserService::new(&pool);

            service
                .create_user(create_payload(&seeded.branch_id, "amaka"))
                .await
                .unwrap();

            let mut duplicate = create_payload(&seeded.branch_id, "amaka");
            duplicate.email = "different@example.com".to_string();
            assert!(matches!(
                service.create_user(duplicate).await,
                Err(ServiceError::AlreadyExists { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn deactivated_user_cannot_authenticate() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = UserService::new(&pool);

            let user = service
                .create_user(create_payload(&seeded.branch_id, "amaka"))
                .await
                .unwrap();
            service.deactivate_user(&user.id).await.unwrap();

            assert!(matches!(
                service
                    .authenticate_user("amaka", "a sufficiently long password")
                    .await,
                Err(ServiceError::Unauthenticated { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn change_role_promotes_user() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = UserService::new(&pool);

            let user = service
                .create_user(create_payload(&seeded.branch_id, "amaka"))
                .await
                .unwrap();

            let updated = service.change_role(&user.id, UserRole::Manager).await.unwrap();
            assert_eq!(updated.role, UserRole::Manager);
        })
        .await;
    }

    #[tokio::test]
    async fn users_of_another_tenant_are_invisible() {
        let pool = test_pool().await;
        let first = seed_tenant(&pool, "greenleaf").await;
        let second = seed_tenant(&pool, "bluecross").await;

        let user = TenantContext::scope(async {
            TenantContext::set(Uuid::parse_str(&first.tenant_id).unwrap());
            UserService::new(&pool)
                .create_user(create_payload(&first.branch_id, "amaka"))
                .await
        })
        .await
        .unwrap();

        TenantContext::scope(async {
            TenantContext::set(Uuid::parse_str(&second.tenant_id).unwrap());
            let service = UserService::new(&pool);

            assert!(matches!(
                service.get_user_required(&user.id).await,
                Err(ServiceError::NotFound { .. })
            ));

            let listed = service
                .list_users(&PaginationFilter::default())
                .await
                .unwrap();
            assert!(listed.items.iter().all(|u| u.tenant_id == second.tenant_id));
        })
        .await;
    }
}
