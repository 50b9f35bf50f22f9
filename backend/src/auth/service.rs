//! Core business logic for the authentication system.
//!
//! Login delegates the credential check to the user service and then mints
//! the token pair. The tenant claim baked into the access token is the only
//! place a request's tenant can ever come from.

use crate::auth::models::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, UserInfo};
use crate::auth::principal::AuthPrincipal;
use crate::database::models::{Tenant, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::tenant_repository::TenantRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::services::validate_dto;
use crate::utils::jwt::TokenService;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Authentication service handling login, token refresh and identity lookup.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, tokens: &'a TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Authenticates the user and mints an access/refresh token pair.
    ///
    /// The access token carries the user's tenant and role as claims; an
    /// inactive tenant is refused the same way bad credentials are.
    pub async fn login(&self, payload: LoginRequest) -> ServiceResult<LoginResponse> {
        validate_dto(&payload)?;

        let user = UserService::new(self.pool)
            .authenticate_user(&payload.username, &payload.password)
            .await?;
        let tenant = self.active_tenant(&user).await?;
        let tenant_uuid = Self::tenant_uuid(&user)?;

        let access_token = self
            .tokens
            .issue(&user.username, tenant_uuid, &user.role.to_string())?;
        let refresh_token = self.tokens.issue_refresh(&user.username)?;

        tracing::info!(username = %user.username, tenant = %tenant.name, "user logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: Self::user_info(user, &tenant),
            expires_in: self.tokens.expires_in_seconds(),
        })
    }

    /// Exchanges a valid refresh token for a fresh access token, re-checking
    /// that the user and tenant are still active.
    pub async fn refresh_token(
        &self,
        payload: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        validate_dto(&payload)?;

        let username = self
            .tokens
            .subject(&payload.refresh_token)
            .ok_or_else(|| ServiceError::unauthenticated("Invalid refresh token"))?;

        let user = UserRepository::new(self.pool)
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| ServiceError::unauthenticated("Invalid refresh token"))?;
        if !user.is_active {
            return Err(ServiceError::unauthenticated("User account is inactive"));
        }
        self.active_tenant(&user).await?;
        let tenant_uuid = Self::tenant_uuid(&user)?;

        let access_token = self
            .tokens
            .issue(&user.username, tenant_uuid, &user.role.to_string())?;

        Ok(RefreshTokenResponse {
            access_token,
            expires_in: self.tokens.expires_in_seconds(),
        })
    }

    /// Identity of the authenticated principal, for `/me`.
    pub async fn current_user(&self, principal: &AuthPrincipal) -> ServiceResult<UserInfo> {
        let tenant_id = principal.tenant_id.to_string();

        let user = UserRepository::new(self.pool)
            .get_user_by_id(&tenant_id, &principal.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &principal.user_id))?;
        let tenant = TenantRepository::new(self.pool)
            .get_tenant_by_id(&tenant_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tenant", &tenant_id))?;

        Ok(Self::user_info(user, &tenant))
    }

    async fn active_tenant(&self, user: &User) -> ServiceResult<Tenant> {
        let tenant = TenantRepository::new(self.pool)
            .get_tenant_by_id(&user.tenant_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tenant", &user.tenant_id))?;
        if !tenant.is_active {
            return Err(ServiceError::unauthenticated("Tenant is inactive"));
        }
        Ok(tenant)
    }

    fn tenant_uuid(user: &User) -> ServiceResult<Uuid> {
        Uuid::parse_str(&user.tenant_id).map_err(|e| {
            ServiceError::internal_error(format!("Malformed tenant id on user record: {}", e))
        })
    }

    fn user_info(user: User, tenant: &Tenant) -> UserInfo {
        UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            tenant_id: user.tenant_id,
            tenant_name: tenant.name.clone(),
            branch_id: user.branch_id,
            role: user.role.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_tenant, test_pool};

    fn tokens() -> TokenService {
        TokenService::new("auth-service-test-secret", 3_600)
    }

    #[tokio::test]
    async fn login_issues_a_token_carrying_the_tenant_claim() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tokens = tokens();
        let service = AuthService::new(&pool, &tokens);

        let response = service
            .login(LoginRequest {
                username: seeded.username.clone(),
                password: "password".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.expires_in, 3_600);
        assert_eq!(response.user.tenant_id, seeded.tenant_id);
        assert_eq!(response.user.role, "Admin");

        assert_eq!(
            tokens.subject(&response.access_token).as_deref(),
            Some(seeded.username.as_str())
        );
        assert_eq!(
            tokens.tenant(&response.access_token).map(|t| t.to_string()),
            Some(seeded.tenant_id.clone())
        );
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tokens = tokens();

        assert!(matches!(
            AuthService::new(&pool, &tokens)
                .login(LoginRequest {
                    username: seeded.username,
                    password: "not the password".to_string(),
                })
                .await,
            Err(ServiceError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn login_to_an_inactive_tenant_is_refused() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tokens = tokens();

        sqlx::query("UPDATE tenants SET is_active = 0 WHERE id = ?")
            .bind(&seeded.tenant_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            AuthService::new(&pool, &tokens)
                .login(LoginRequest {
                    username: seeded.username,
                    password: "password".to_string(),
                })
                .await,
            Err(ServiceError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn refresh_reissues_an_access_token() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tokens = tokens();
        let service = AuthService::new(&pool, &tokens);

        let login = service
            .login(LoginRequest {
                username: seeded.username.clone(),
                password: "password".to_string(),
            })
            .await
            .unwrap();

        let refreshed = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await
            .unwrap();

        assert_eq!(
            tokens.tenant(&refreshed.access_token).map(|t| t.to_string()),
            Some(seeded.tenant_id)
        );
    }

    #[tokio::test]
    async fn refresh_with_garbage_token_is_unauthenticated() {
        let pool = test_pool().await;
        seed_tenant(&pool, "greenleaf").await;
        let tokens = tokens();

        assert!(matches!(
            AuthService::new(&pool, &tokens)
                .refresh_token(RefreshTokenRequest {
                    refresh_token: "not-a-token".to_string(),
                })
                .await,
            Err(ServiceError::Unauthenticated { .. })
        ));
    }
}
