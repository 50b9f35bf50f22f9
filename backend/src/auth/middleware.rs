//! Middleware for authentication, tenant scoping and authorization.
//!
//! `tenant_context` wraps every request: it authenticates the bearer token
//! when one is present and otherwise lets the request through untouched.
//! Rejection is the job of the per-route guards (`require_auth`,
//! `require_manager`, `require_admin`) layered onto protected routes.

use axum::{
    Extension,
    extract::Request,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::principal::{AuthPrincipal, PrincipalLookup, SharedPrincipalLookup};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::UserRole;
use crate::utils::jwt::TokenService;

/// Request-scoped authentication middleware, applied to the whole router.
///
/// Every request runs inside a fresh [`TenantContext::scope`]. When the
/// bearer token verifies and resolves to an active user, the tenant is
/// stored in the context and the principal attached to the request;
/// otherwise the request simply proceeds unauthenticated. This middleware
/// never rejects a request itself.
pub async fn tenant_context(
    Extension(tokens): Extension<Arc<TokenService>>,
    Extension(lookup): Extension<SharedPrincipalLookup>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = resolve_principal(&tokens, lookup.as_ref(), request.headers()).await;

    TenantContext::scope(async move {
        if let Some(principal) = principal {
            TenantContext::set(principal.tenant_id);
            request.extensions_mut().insert(principal);
        }
        next.run(request).await
    })
    .await
}

/// Bearer header to principal; any failure along the way means "no principal".
async fn resolve_principal(
    tokens: &TokenService,
    lookup: &dyn PrincipalLookup,
    headers: &HeaderMap,
) -> Option<AuthPrincipal> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let Some(username) = tokens.subject(token) else {
        tracing::debug!("bearer token failed verification");
        return None;
    };
    // The tenant comes from the validated token only, never from a header.
    let Some(tenant_id) = tokens.tenant(token) else {
        tracing::debug!("bearer token carries no usable tenant claim");
        return None;
    };

    let user = match lookup.find_principal_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(username, "token subject does not resolve to a user");
            return None;
        }
        Err(error) => {
            tracing::error!("principal lookup failed: {}", error);
            return None;
        }
    };

    if !user.is_active {
        tracing::debug!(username, "user is inactive");
        return None;
    }

    match Uuid::parse_str(&user.tenant_id) {
        Ok(user_tenant) if user_tenant == tenant_id => Some(AuthPrincipal {
            user_id: user.id,
            username: user.username,
            tenant_id,
            branch_id: user.branch_id,
            role: user.role,
        }),
        _ => {
            tracing::warn!(username, "token tenant does not match the user's tenant");
            None
        }
    }
}

/// Rejects requests that did not authenticate.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    if request.extensions().get::<AuthPrincipal>().is_none() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

/// Rejects requests whose principal is neither a manager nor an admin.
pub async fn require_manager(request: Request, next: Next) -> Result<Response, StatusCode> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !principal.role.is_manager() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

/// Rejects requests whose principal is not an admin.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, StatusCode> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if principal.role != UserRole::Admin {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::{
        Json, Router,
        body::Body,
        http::Request as HttpRequest,
        middleware,
        routing::get,
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::database::models::User;

    const SECRET: &str = "middleware-test-signing-secret";

    struct StaticLookup(Vec<User>);

    #[async_trait]
    impl PrincipalLookup for StaticLookup {
        async fn find_principal_by_username(&self, username: &str) -> Result<Option<User>> {
            Ok(self.0.iter().find(|u| u.username == username).cloned())
        }
    }

    fn test_user(username: &str, tenant_id: Uuid, role: UserRole, is_active: bool) -> User {
        User {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            branch_id: Uuid::now_v7().to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            role,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    async fn whoami(request: Request) -> Json<Value> {
        let principal = request.extensions().get::<AuthPrincipal>();
        Json(json!({
            "authenticated": principal.is_some(),
            "username": principal.map(|p| p.username.clone()),
            "tenant": TenantContext::current().map(|t| t.to_string()),
        }))
    }

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn app(users: Vec<User>) -> Router {
        let tokens = Arc::new(TokenService::new(SECRET, 86_400));
        let lookup: SharedPrincipalLookup = Arc::new(StaticLookup(users));

        Router::new()
            .route("/whoami", get(whoami))
            .route(
                "/protected",
                get(ok_handler).layer(middleware::from_fn(require_auth)),
            )
            .route(
                "/manager-only",
                get(ok_handler).layer(middleware::from_fn(require_manager)),
            )
            .route(
                "/admin-only",
                get(ok_handler).layer(middleware::from_fn(require_admin)),
            )
            .layer(middleware::from_fn(tenant_context))
            .layer(Extension(tokens))
            .layer(Extension(lookup))
    }

    fn issue(username: &str, tenant_id: Uuid, role: &str) -> String {
        TokenService::new(SECRET, 86_400)
            .issue(username, tenant_id, role)
            .unwrap()
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn request_without_token_passes_through_unauthenticated() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);

        let (status, body) = get_json(app, "/whoami", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], json!(false));
        assert_eq!(body["tenant"], Value::Null);
    }

    #[tokio::test]
    async fn request_with_garbage_token_passes_through_unauthenticated() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);

        let (status, body) = get_json(app, "/whoami", Some("definitely-not-a-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], json!(false));
    }

    #[tokio::test]
    async fn valid_token_sets_principal_and_tenant() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);
        let token = issue("amaka", tenant, "Cashier");

        let (status, body) = get_json(app, "/whoami", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], json!(true));
        assert_eq!(body["username"], json!("amaka"));
        assert_eq!(body["tenant"], json!(tenant.to_string()));
    }

    #[tokio::test]
    async fn unknown_subject_passes_through_unauthenticated() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);
        let token = issue("nobody", tenant, "Cashier");

        let (_, body) = get_json(app, "/whoami", Some(&token)).await;

        assert_eq!(body["authenticated"], json!(false));
    }

    #[tokio::test]
    async fn inactive_user_passes_through_unauthenticated() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, false)]);
        let token = issue("amaka", tenant, "Cashier");

        let (_, body) = get_json(app, "/whoami", Some(&token)).await;

        assert_eq!(body["authenticated"], json!(false));
    }

    #[tokio::test]
    async fn token_for_wrong_tenant_passes_through_unauthenticated() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);
        let token = issue("amaka", Uuid::now_v7(), "Cashier");

        let (_, body) = get_json(app, "/whoami", Some(&token)).await;

        assert_eq!(body["authenticated"], json!(false));
    }

    #[tokio::test]
    async fn protected_route_rejects_unauthenticated_requests() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);

        let (status, _) = get_json(app, "/protected", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_accepts_authenticated_requests() {
        let tenant = Uuid::now_v7();
        let app = app(vec![test_user("amaka", tenant, UserRole::Cashier, true)]);
        let token = issue("amaka", tenant, "Cashier");

        let (status, _) = get_json(app, "/protected", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn role_guards_distinguish_cashier_manager_and_admin() {
        let tenant = Uuid::now_v7();
        let users = vec![
            test_user("cashier", tenant, UserRole::Cashier, true),
            test_user("manager", tenant, UserRole::Manager, true),
            test_user("admin", tenant, UserRole::Admin, true),
        ];

        let cashier = issue("cashier", tenant, "Cashier");
        let manager = issue("manager", tenant, "Manager");
        let admin = issue("admin", tenant, "Admin");

        let (status, _) = get_json(app(users.clone()), "/manager-only", Some(&cashier)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = get_json(app(users.clone()), "/manager-only", Some(&manager)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(app(users.clone()), "/admin-only", Some(&manager)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = get_json(app(users), "/admin-only", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
