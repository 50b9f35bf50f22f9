//! Procurement business logic: purchase order lifecycle and goods receipt.
//!
//! Orders move Draft -> Submitted -> Received, with cancellation allowed
//! until goods arrive. Receiving an order is the only path that books
//! purchased stock into a branch.

use crate::api::common::{ListFilter, PaginatedData};
use crate::auth::tenant_context::TenantContext;
use crate::database::models::{
    CreatePurchaseOrder, MovementType, PurchaseOrder, PurchaseOrderItem, PurchaseOrderStatus,
    PurchaseOrderWithItems, ReceivePurchaseOrder,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::product_repository::ProductRepository;
use crate::repositories::purchase_order_repository::PurchaseOrderRepository;
use crate::repositories::supplier_repository::SupplierRepository;
use crate::services::validate_dto;
use crate::utils::reference;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Service layer for purchase order operations.
pub struct PurchaseOrderService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> PurchaseOrderService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a draft order with its line items.
    pub async fn create_order(
        &self,
        payload: CreatePurchaseOrder,
        created_by: &str,
    ) -> ServiceResult<PurchaseOrderWithItems> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        if BranchRepository::new(self.pool)
            .get_branch_by_id(&tenant_id, &payload.branch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Branch", &payload.branch_id));
        }

        let supplier = SupplierRepository::new(self.pool)
            .get_supplier_by_id(&tenant_id, &payload.supplier_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", &payload.supplier_id))?;
        if !supplier.is_active {
            return Err(ServiceError::invalid_operation(
                "Cannot order from an inactive supplier",
            ));
        }

        let product_repo = ProductRepository::new(self.pool);
        for item in &payload.items {
            if product_repo
                .get_product_by_id(&tenant_id, &item.product_id)
                .await?
                .is_none()
            {
                return Err(ServiceError::not_found("Product", &item.product_id));
            }
        }

        let now = Utc::now();
        let order = PurchaseOrder {
            id: Uuid::now_v7().to_string(),
            tenant_id,
            branch_id: payload.branch_id,
            supplier_id: payload.supplier_id,
            reference: reference::order_reference(),
            status: PurchaseOrderStatus::Draft,
            expected_date: payload.expected_date,
            created_by: created_by.to_string(),
            received_at: None,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<PurchaseOrderItem> = payload
            .items
            .iter()
            .map(|item| PurchaseOrderItem {
                id: Uuid::now_v7().to_string(),
                purchase_order_id: order.id.clone(),
                product_id: item.product_id.clone(),
                quantity_ordered: item.quantity,
                quantity_received: 0,
                unit_cost_cents: item.unit_cost_cents,
            })
            .collect();

        let mut tx = self.pool.begin().await?;
        PurchaseOrderRepository::insert_order(&mut tx, &order).await?;
        for item in &items {
            PurchaseOrderRepository::insert_item(&mut tx, item).await?;
        }
        tx.commit().await?;

        tracing::info!(reference = %order.reference, "purchase order created");

        Ok(PurchaseOrderWithItems {
            purchase_order: order,
            items,
        })
    }

    pub async fn get_order_required(&self, id: &str) -> ServiceResult<PurchaseOrderWithItems> {
        let tenant_id = TenantContext::require()?.to_string();
        let repo = PurchaseOrderRepository::new(self.pool);

        let order = repo
            .get_order_by_id(&tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Purchase order", id))?;
        let items = repo.get_items(&order.id).await?;

        Ok(PurchaseOrderWithItems {
            purchase_order: order,
            items,
        })
    }

    pub async fn list_orders(
        &self,
        filter: &ListFilter<PurchaseOrderStatus>,
    ) -> ServiceResult<PaginatedData<PurchaseOrder>> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(filter)?;

        let repo = PurchaseOrderRepository::new(self.pool);
        let statuses = filter.states.as_deref();

        let orders = repo
            .list_orders(&tenant_id, statuses, &filter.pagination())
            .await?;
        let total = repo.count_orders(&tenant_id, statuses).await?;

        Ok(PaginatedData::new(orders, total))
    }

    /// Draft -> Submitted.
    pub async fn submit_order(&self, id: &str) -> ServiceResult<PurchaseOrderWithItems> {
        let tenant_id = TenantContext::require()?.to_string();

        let mut tx = self.pool.begin().await?;
        let moved = PurchaseOrderRepository::transition_status(
            &mut tx,
            &tenant_id,
            id,
            PurchaseOrderStatus::Draft,
            PurchaseOrderStatus::Submitted,
            None,
        )
        .await?;
        if !moved {
            tx.rollback().await?;
            return Err(self.transition_refusal(id, "Only draft orders can be submitted").await?);
        }
        tx.commit().await?;

        self.get_order_required(id).await
    }

    /// Submitted -> Received: books the delivered quantities into branch
    /// stock and appends one receipt movement per line.
    ///
    /// Items absent from the override list receive exactly the ordered
    /// quantity. The status guard makes a second receipt attempt fail, so
    /// stock is never booked twice.
    pub async fn receive_order(
        &self,
        id: &str,
        payload: ReceivePurchaseOrder,
        received_by: &str,
    ) -> ServiceResult<PurchaseOrderWithItems> {
        let tenant_id = TenantContext::require()?.to_string();
        validate_dto(&payload)?;

        let order = self.get_order_required(id).await?;
        let overrides: HashMap<&str, i64> = payload
            .items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|item| (item.product_id.as_str(), item.quantity_received))
            .collect();
        for product_id in overrides.keys() {
            if !order
                .items
                .iter()
                .any(|item| item.product_id == *product_id)
            {
                return Err(ServiceError::validation(format!(
                    "Product {} is not on this order",
                    product_id
                )));
            }
        }

        let mut tx = self.pool.begin().await?;
        let moved = PurchaseOrderRepository::transition_status(
            &mut tx,
            &tenant_id,
            id,
            PurchaseOrderStatus::Submitted,
            PurchaseOrderStatus::Received,
            Some(Utc::now()),
        )
        .await?;
        if !moved {
            tx.rollback().await?;
            return Err(self
                .transition_refusal(id, "Only submitted orders can be received")
                .await?);
        }

        for item in &order.items {
            let quantity = overrides
                .get(item.product_id.as_str())
                .copied()
                .unwrap_or(item.quantity_ordered);
            PurchaseOrderRepository::set_item_received(&mut tx, id, &item.product_id, quantity)
                .await?;
            if quantity > 0 {
                InventoryRepository::add_stock(
                    &mut tx,
                    &tenant_id,
                    &order.purchase_order.branch_id,
                    &item.product_id,
                    quantity,
                )
                .await?;
                InventoryRepository::insert_movement(
                    &mut tx,
                    &tenant_id,
                    &order.purchase_order.branch_id,
                    &item.product_id,
                    MovementType::PurchaseReceipt,
                    quantity,
                    &order.purchase_order.reference,
                    received_by,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(reference = %order.purchase_order.reference, "purchase order received");

        self.get_order_required(id).await
    }

    /// Cancels an order that has not yet been received.
    pub async fn cancel_order(&self, id: &str) -> ServiceResult<PurchaseOrderWithItems> {
        let tenant_id = TenantContext::require()?.to_string();

        let order = self.get_order_required(id).await?;
        let from = match order.purchase_order.status {
            PurchaseOrderStatus::Draft => PurchaseOrderStatus::Draft,
            PurchaseOrderStatus::Submitted => PurchaseOrderStatus::Submitted,
            _ => {
                return Err(ServiceError::invalid_operation(
                    "Only draft or submitted orders can be cancelled",
                ));
            }
        };

        let mut tx = self.pool.begin().await?;
        let moved = PurchaseOrderRepository::transition_status(
            &mut tx,
            &tenant_id,
            id,
            from,
            PurchaseOrderStatus::Cancelled,
            None,
        )
        .await?;
        if !moved {
            tx.rollback().await?;
            return Err(ServiceError::invalid_operation(
                "Only draft or submitted orders can be cancelled",
            ));
        }
        tx.commit().await?;

        self.get_order_required(id).await
    }

    /// Distinguishes an unknown order from a wrong-state one after a guarded
    /// transition affected zero rows.
    async fn transition_refusal(&self, id: &str, message: &str) -> ServiceResult<ServiceError> {
        let tenant_id = TenantContext::require()?.to_string();
        let exists = PurchaseOrderRepository::new(self.pool)
            .get_order_by_id(&tenant_id, id)
            .await?
            .is_some();

        Ok(if exists {
            ServiceError::invalid_operation(message)
        } else {
            ServiceError::not_found("Purchase order", id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreatePurchaseOrderItem, ReceivePurchaseOrderItem};
    use crate::database::test_support::{SeededTenant, seed_tenant, test_pool};
    use crate::services::inventory_service::InventoryService;
    use crate::services::product_service::{ProductService, tests::paracetamol};
    use crate::services::supplier_service::{SupplierService, tests::acme_pharma};

    async fn order_payload(pool: &SqlitePool, seeded: &SeededTenant) -> CreatePurchaseOrder {
        let product = ProductService::new(pool)
            .create_product(paracetamol())
            .await
            .unwrap();
        let supplier = SupplierService::new(pool)
            .create_supplier(acme_pharma())
            .await
            .unwrap();

        CreatePurchaseOrder {
            branch_id: seeded.branch_id.clone(),
            supplier_id: supplier.id,
            expected_date: None,
            items: vec![CreatePurchaseOrderItem {
                product_id: product.id,
                quantity: 50,
                unit_cost_cents: 140,
            }],
        }
    }

    #[tokio::test]
    async fn full_order_lifecycle_books_stock_once() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = PurchaseOrderService::new(&pool);

            let payload = order_payload(&pool, &seeded).await;
            let product_id = payload.items[0].product_id.clone();
            let order = service.create_order(payload, &seeded.user_id).await.unwrap();
            assert_eq!(order.purchase_order.status, PurchaseOrderStatus::Draft);
            assert!(order.purchase_order.reference.starts_with("PO-"));

            // Receiving a draft is refused.
            assert!(matches!(
                service
                    .receive_order(
                        &order.purchase_order.id,
                        ReceivePurchaseOrder { items: None },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));

            let submitted = service.submit_order(&order.purchase_order.id).await.unwrap();
            assert_eq!(submitted.purchase_order.status, PurchaseOrderStatus::Submitted);

            let received = service
                .receive_order(
                    &order.purchase_order.id,
                    ReceivePurchaseOrder { items: None },
                    &seeded.user_id,
                )
                .await
                .unwrap();
            assert_eq!(received.purchase_order.status, PurchaseOrderStatus::Received);
            assert_eq!(received.items[0].quantity_received, 50);

            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 50);

            // Receiving again must not double-book stock.
            assert!(matches!(
                service
                    .receive_order(
                        &order.purchase_order.id,
                        ReceivePurchaseOrder { items: None },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));
            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 50);
        })
        .await;
    }

    #[tokio::test]
    async fn partial_receipt_uses_the_override_quantity() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = PurchaseOrderService::new(&pool);

            let payload = order_payload(&pool, &seeded).await;
            let product_id = payload.items[0].product_id.clone();
            let order = service.create_order(payload, &seeded.user_id).await.unwrap();
            service.submit_order(&order.purchase_order.id).await.unwrap();

            let received = service
                .receive_order(
                    &order.purchase_order.id,
                    ReceivePurchaseOrder {
                        items: Some(vec![ReceivePurchaseOrderItem {
                            product_id: product_id.clone(),
                            quantity_received: 30,
                        }]),
                    },
                    &seeded.user_id,
                )
                .await
                .unwrap();
            assert_eq!(received.items[0].quantity_received, 30);

            let level = InventoryService::new(&pool)
                .get_stock_level(&seeded.branch_id, &product_id)
                .await
                .unwrap();
            assert_eq!(level.quantity_on_hand, 30);
        })
        .await;
    }

    #[tokio::test]
    async fn cancelled_orders_cannot_be_received() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = PurchaseOrderService::new(&pool);

            let payload = order_payload(&pool, &seeded).await;
            let order = service.create_order(payload, &seeded.user_id).await.unwrap();
            service.submit_order(&order.purchase_order.id).await.unwrap();

            let cancelled = service.cancel_order(&order.purchase_order.id).await.unwrap();
            assert_eq!(cancelled.purchase_order.status, PurchaseOrderStatus::Cancelled);

            assert!(matches!(
                service
                    .receive_order(
                        &order.purchase_order.id,
                        ReceivePurchaseOrder { items: None },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::InvalidOperation { .. })
            ));
            assert!(matches!(
                service.cancel_order(&order.purchase_order.id).await,
                Err(ServiceError::InvalidOperation { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn override_for_unknown_product_is_rejected() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = PurchaseOrderService::new(&pool);

            let payload = order_payload(&pool, &seeded).await;
            let order = service.create_order(payload, &seeded.user_id).await.unwrap();
            service.submit_order(&order.purchase_order.id).await.unwrap();

            assert!(matches!(
                service
                    .receive_order(
                        &order.purchase_order.id,
                        ReceivePurchaseOrder {
                            items: Some(vec![ReceivePurchaseOrderItem {
                                product_id: "not-on-the-order".to_string(),
                                quantity_received: 5,
                            }]),
                        },
                        &seeded.user_id,
                    )
                    .await,
                Err(ServiceError::Validation { .. })
            ));
        })
        .await;
    }

    #[tokio::test]
    async fn listing_filters_by_status() {
        let pool = test_pool().await;
        let seeded = seed_tenant(&pool, "greenleaf").await;
        let tenant = Uuid::parse_str(&seeded.tenant_id).unwrap();

        TenantContext::scope(async {
            TenantContext::set(tenant);
            let service = PurchaseOrderService::new(&pool);

            let payload = order_payload(&pool, &seeded).await;
            let first = service
                .create_order(payload.clone(), &seeded.user_id)
                .await
                .unwrap();
            service.create_order(payload, &seeded.user_id).await.unwrap();
            service.submit_order(&first.purchase_order.id).await.unwrap();

            let submitted = service
                .list_orders(&ListFilter {
                    page: None,
                    per_page: None,
                    from: None,
                    to: None,
                    states: Some(vec![PurchaseOrderStatus::Submitted]),
                })
                .await
                .unwrap();
            assert_eq!(submitted.total, 1);

            let all = service
                .list_orders(&ListFilter {
                    page: None,
                    per_page: None,
                    from: None,
                    to: None,
                    states: None,
                })
                .await
                .unwrap();
            assert_eq!(all.total, 2);
        })
        .await;
    }
}
