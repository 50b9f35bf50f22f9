//! Authenticated principal resolution.
//!
//! The middleware turns a verified token subject into an [`AuthPrincipal`]
//! through the [`PrincipalLookup`] capability. Production wires the
//! database-backed lookup; middleware tests substitute an in-memory one.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{User, UserRole};
use crate::repositories::user_repository::UserRepository;

/// Identity attached to a request after successful authentication.
#[derive(Debug, Clone)]
pub struct AuthPrincipal {
    pub user_id: String,
    pub username: String,
    pub tenant_id: Uuid,
    pub branch_id: String,
    pub role: UserRole,
}

/// Resolves a token subject to the user record behind it.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    async fn find_principal_by_username(&self, username: &str) -> Result<Option<User>>;
}

pub type SharedPrincipalLookup = std::sync::Arc<dyn PrincipalLookup>;

pub struct DbPrincipalLookup {
    pool: SqlitePool,
}

impl DbPrincipalLookup {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalLookup for DbPrincipalLookup {
    async fn find_principal_by_username(&self, username: &str) -> Result<Option<User>> {
        UserRepository::new(&self.pool)
            .get_user_by_username(username)
            .await
    }
}
