//! Task-local tenant context.
//!
//! Each request is processed inside a [`TenantContext::scope`], which binds a
//! fresh empty slot to the current task. The authentication middleware stores
//! the tenant of the validated token there; services read it back without any
//! parameter plumbing. The slot is destroyed when the scope future finishes,
//! whether it completed, returned an error or panicked, so no tenant ever
//! leaks into a later request on a reused worker.

use std::cell::Cell;
use std::future::Future;
use uuid::Uuid;

use crate::errors::{ServiceError, ServiceResult};

tokio::task_local! {
    static CURRENT_TENANT: Cell<Option<Uuid>>;
}

pub struct TenantContext;

impl TenantContext {
    /// Runs `fut` with an empty tenant slot bound to the current task.
    pub async fn scope<F>(fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_TENANT.scope(Cell::new(None), fut).await
    }

    /// Stores the authenticated tenant for the current task, replacing any
    /// previous value. Outside a scope this is a no-op.
    pub fn set(tenant_id: Uuid) {
        let _ = CURRENT_TENANT.try_with(|slot| slot.set(Some(tenant_id)));
    }

    /// The tenant of the current task, or `None` when unauthenticated or
    /// outside any request scope.
    pub fn current() -> Option<Uuid> {
        CURRENT_TENANT.try_with(Cell::get).ok().flatten()
    }

    /// Empties the slot. Idempotent; a no-op outside a scope.
    pub fn clear() {
        let _ = CURRENT_TENANT.try_with(|slot| slot.set(None));
    }

    /// The tenant of the current task, refusing to proceed without one.
    /// Every tenant-scoped service operation goes through this.
    pub fn require() -> ServiceResult<Uuid> {
        Self::current()
            .ok_or_else(|| ServiceError::permission_denied("No authenticated tenant in scope"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    #[test]
    fn absent_outside_any_scope() {
        assert_eq!(TenantContext::current(), None);
        assert!(matches!(
            TenantContext::require(),
            Err(ServiceError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn set_current_clear_round_trip() {
        TenantContext::scope(async {
            assert_eq!(TenantContext::current(), None);

            let tenant = Uuid::now_v7();
            TenantContext::set(tenant);
            assert_eq!(TenantContext::current(), Some(tenant));
            assert!(TenantContext::require().is_ok());

            TenantContext::clear();
            assert_eq!(TenantContext::current(), None);
            TenantContext::clear();
            assert_eq!(TenantContext::current(), None);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_scopes_are_isolated() {
        let barrier = Arc::new(Barrier::new(2));
        let tenant_a = Uuid::now_v7();
        let tenant_b = Uuid::now_v7();

        let gate = barrier.clone();
        let first = tokio::spawn(TenantContext::scope(async move {
            TenantContext::set(tenant_a);
            gate.wait().await;
            // By now the other task has stored its own tenant.
            gate.wait().await;
            TenantContext::current()
        }));

        let gate = barrier.clone();
        let second = tokio::spawn(TenantContext::scope(async move {
            gate.wait().await;
            TenantContext::set(tenant_b);
            gate.wait().await;
            TenantContext::current()
        }));

        assert_eq!(first.await.unwrap(), Some(tenant_a));
        assert_eq!(second.await.unwrap(), Some(tenant_b));
    }

    #[tokio::test]
    async fn scope_cleans_up_after_errors() {
        let result: Result<(), &str> = TenantContext::scope(async {
            TenantContext::set(Uuid::now_v7());
            Err("checkout failed")
        })
        .await;

        assert!(result.is_err());
        assert_eq!(TenantContext::current(), None);
    }

    #[tokio::test]
    async fn scope_cleans_up_after_panics() {
        let handle = tokio::spawn(TenantContext::scope(async {
            TenantContext::set(Uuid::now_v7());
            panic!("boom");
        }));

        assert!(handle.await.is_err());
        assert_eq!(TenantContext::current(), None);
    }

    #[tokio::test]
    async fn fresh_scope_starts_empty() {
        TenantContext::scope(async {
            TenantContext::set(Uuid::now_v7());
        })
        .await;

        TenantContext::scope(async {
            assert_eq!(TenantContext::current(), None);
        })
        .await;
    }
}
