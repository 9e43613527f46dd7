//! Order workflows
//!
//! [`OrderService`] is the single entry point for placing orders and moving
//! them through the status lifecycle. Placement is check-then-commit: the
//! availability pre-check produces precise errors in the common case, while
//! correctness under concurrent placements comes from the store's guarded
//! decrements at commit time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::db::models::{InventoryItem, Order};
use crate::orders::draft;
use crate::orders::error::{PlacementError, PlacementResult};
use crate::orders::store::{CommitError, OrderStore};
use shared::order::{OrderStatus, PlaceOrderRequest};

/// Bounded retry budget for order code collisions.
const MAX_CODE_ATTEMPTS: u32 = 3;

/// Pluggable code source; tests inject deterministic generators.
pub type CodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    code_gen: CodeGenerator,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            store,
            code_gen: Arc::new(shared::util::order_code),
        }
    }

    /// Same service with a custom code generator (collision handling tests).
    pub fn with_code_generator(
        store: Arc<dyn OrderStore>,
        code_gen: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            code_gen: Arc::new(code_gen),
        }
    }

    /// Place an order: validate the request, load and pre-check the ledger,
    /// then commit every stock decrement together with the order insert as
    /// one atomic unit. On a code collision the commit is retried with a
    /// fresh code up to a small bounded budget.
    pub async fn place_order(&self, req: PlaceOrderRequest) -> PlacementResult<Order> {
        draft::validate_request(&req)?;

        let mut ids: Vec<String> = Vec::new();
        for line in &req.line_items {
            if !ids.contains(&line.item_id) {
                ids.push(line.item_id.clone());
            }
        }
        let loaded = self.store.load_items(&ids).await?;
        let items: HashMap<String, InventoryItem> = loaded
            .into_iter()
            .filter_map(|item| {
                let key = item.id.as_ref()?.to_string();
                Some((key, item))
            })
            .collect();

        let (mut order, decrements) = draft::build_order(&req, &items)?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            order.code = (self.code_gen)();
            match self.store.commit_placement(&decrements, &order).await {
                Ok(created) => {
                    tracing::info!(
                        code = %created.code,
                        total = %created.total_amount,
                        lines = created.line_items.len(),
                        "Order placed"
                    );
                    return Ok(created);
                }
                Err(CommitError::DuplicateCode { code }) => {
                    tracing::warn!(code = %code, attempt, "Order code collision, regenerating");
                }
                Err(CommitError::StockConflict { item_id }) => {
                    tracing::warn!(item_id = %item_id, "Placement lost a stock race");
                    return Err(PlacementError::StockConflict { item_id });
                }
                Err(CommitError::Store(e)) => return Err(e.into()),
            }
        }
        Err(PlacementError::OrderCodeExhausted)
    }

    /// Move an order through the status lifecycle. Stock is untouched here:
    /// it was committed at creation time, and cancellation does not restock.
    pub async fn transition_status(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> PlacementResult<Order> {
        let Some(current) = self.store.get_order(order_id).await? else {
            return Err(PlacementError::OrderNotFound(order_id.to_string()));
        };
        let from = current.status;
        if !from.can_transition(target) {
            return Err(PlacementError::InvalidTransition { from, to: target });
        }
        match self
            .store
            .update_order_status(order_id, from, target, Utc::now())
            .await?
        {
            Some(order) => {
                tracing::info!(code = %order.code, %from, to = %target, "Order status updated");
                Ok(order)
            }
            None => {
                // Lost a race: report against whatever the status is now
                match self.store.get_order(order_id).await? {
                    Some(order) => Err(PlacementError::InvalidTransition {
                        from: order.status,
                        to: target,
                    }),
                    None => Err(PlacementError::OrderNotFound(order_id.to_string())),
                }
            }
        }
    }

    pub async fn get_order(&self, order_id: &str) -> PlacementResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| PlacementError::OrderNotFound(order_id.to_string()))
    }

    /// Look an order up by its external code.
    pub async fn find_by_code(&self, code: &str) -> PlacementResult<Order> {
        self.store
            .find_order_by_code(code)
            .await?
            .ok_or_else(|| PlacementError::OrderNotFound(code.to_string()))
    }

    /// All orders, most recent first.
    pub async fn list_orders(&self) -> PlacementResult<Vec<Order>> {
        Ok(self.store.list_orders().await?)
    }

    /// Orders in one lifecycle state, most recent first.
    pub async fn list_by_status(&self, status: OrderStatus) -> PlacementResult<Vec<Order>> {
        Ok(self.store.list_orders_by_status(status).await?)
    }

    /// Exposed for diagnostics and tests; placement generates its own codes.
    pub fn generate_order_code(&self) -> String {
        (self.code_gen)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::store::MemoryOrderStore;
    use futures::future::join_all;
    use rust_decimal::Decimal;
    use shared::order::OrderLineInput;
    use shared::util::is_valid_order_code;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn kibble(quantity: i64, price: &str) -> InventoryItem {
        InventoryItem {
            id: None,
            name: "Puppy Kibble 2kg".into(),
            category: "food".into(),
            description: String::new(),
            unit: "bag".into(),
            quantity_on_hand: quantity,
            unit_price: dec(price),
            image: String::new(),
        }
    }

    fn request(item_id: &str, quantity: i64, total: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            line_items: vec![OrderLineInput {
                item_id: item_id.to_string(),
                quantity,
            }],
            total_amount: dec(total),
            customer_name: "Ada Lovelace".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "+34600000000".into(),
            delivery_address: "1 Harbour Row".into(),
            notes: None,
        }
    }

    async fn setup(quantity: i64, price: &str) -> (MemoryOrderStore, OrderService, String) {
        let store = MemoryOrderStore::new();
        let item_id = store.put_item(kibble(quantity, price)).await;
        let service = OrderService::new(Arc::new(store.clone()));
        (store, service, item_id)
    }

    #[tokio::test]
    async fn placement_decrements_and_returns_a_pending_order() {
        let (store, service, item_id) = setup(5, "12.50").await;

        let order = service
            .place_order(request(&item_id, 3, "37.50"))
            .await
            .expect("place");
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(is_valid_order_code(&order.code));
        assert_eq!(order.total_amount, dec("37.50"));
        assert_eq!(store.item_quantity(&item_id).await, Some(2));

        let id = order.id.expect("assigned id").to_string();
        let fetched = service.get_order(&id).await.expect("get");
        assert_eq!(fetched.code, order.code);
        let by_code = service.find_by_code(&order.code).await.expect("by code");
        assert_eq!(by_code.id.expect("id").to_string(), id);
    }

    #[tokio::test]
    async fn validation_errors_never_reach_the_store() {
        let (store, service, item_id) = setup(5, "12.50").await;
        // Even an unavailable store cannot be hit by a validation failure
        store.set_unavailable(true);

        let mut req = request(&item_id, 1, "12.50");
        req.line_items.clear();
        let err = service.place_order(req).await.expect_err("must fail");
        assert!(matches!(err, PlacementError::Validation(_)));

        store.set_unavailable(false);
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_quantity(&item_id).await, Some(5));
    }

    #[tokio::test]
    async fn unknown_items_are_reported_without_side_effects() {
        let (store, service, item_id) = setup(5, "12.50").await;
        let err = service
            .place_order(request("item:ghost", 1, "12.50"))
            .await
            .expect_err("must fail");
        match err {
            PlacementError::ItemNotFound(missing) => assert_eq!(missing, "item:ghost"),
            other => panic!("expected ItemNotFound, got {other:?}"),
        }
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_quantity(&item_id).await, Some(5));
    }

    #[tokio::test]
    async fn insufficient_stock_carries_quantities() {
        let (store, service, item_id) = setup(2, "10.00").await;
        let err = service
            .place_order(request(&item_id, 3, "30.00"))
            .await
            .expect_err("must fail");
        match err {
            PlacementError::InsufficientStock {
                item_id: failed,
                available,
                requested,
            } => {
                assert_eq!(failed, item_id);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(store.item_quantity(&item_id).await, Some(2));
    }

    #[tokio::test]
    async fn code_collisions_retry_with_a_fresh_code() {
        let (store, service, item_id) = setup(10, "10.00").await;

        // Occupy a fixed code
        let fixed = "ORD-AAAAAAAA00000001".to_string();
        let occupied = {
            let fixed = fixed.clone();
            OrderService::with_code_generator(
                Arc::new(store.clone()),
                move || fixed.clone(),
            )
        };
        occupied
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect("first placement");

        // A generator that collides once, then produces a fresh code
        let calls = Arc::new(AtomicUsize::new(0));
        let retried = {
            let fixed = fixed.clone();
            let calls = calls.clone();
            OrderService::with_code_generator(Arc::new(store.clone()), move || {
                match calls.fetch_add(1, Ordering::Relaxed) {
                    0 => fixed.clone(),
                    _ => "ORD-BBBBBBBB00000001".to_string(),
                }
            })
        };
        let order = retried
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect("retried placement");
        assert_eq!(order.code, "ORD-BBBBBBBB00000001");
        assert_eq!(calls.load(Ordering::Relaxed), 2);

        // A generator that never stops colliding exhausts the budget
        let stuck = OrderService::with_code_generator(
            Arc::new(store.clone()),
            move || fixed.clone(),
        );
        let err = stuck
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect_err("must exhaust");
        assert!(matches!(err, PlacementError::OrderCodeExhausted));
        assert!(err.is_infrastructure());

        // Only the two successful placements decremented stock
        assert_eq!(store.item_quantity(&item_id).await, Some(8));
        assert_eq!(service.generate_order_code().len(), 20);
    }

    #[tokio::test]
    async fn storage_faults_surface_as_unavailable() {
        let (store, service, item_id) = setup(5, "10.00").await;
        store.set_unavailable(true);
        let err = service
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, PlacementError::StorageUnavailable(_)));
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn lifecycle_transitions_stamp_timestamps() {
        let (store, service, item_id) = setup(5, "10.00").await;
        let order = service
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect("place");
        let id = order.id.expect("id").to_string();

        let accepted = service
            .transition_status(&id, OrderStatus::Accepted)
            .await
            .expect("accept");
        assert_eq!(accepted.status, OrderStatus::Accepted);
        assert!(accepted.accepted_at.is_some());

        let completed = service
            .transition_status(&id, OrderStatus::Completed)
            .await
            .expect("complete");
        assert!(completed.completed_at.is_some());

        // Terminal: nothing leaves completed
        let err = service
            .transition_status(&id, OrderStatus::Pending)
            .await
            .expect_err("must fail");
        match err {
            PlacementError::InvalidTransition { from, to } => {
                assert_eq!(from, OrderStatus::Completed);
                assert_eq!(to, OrderStatus::Pending);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
        let current = service.get_order(&id).await.expect("get");
        assert_eq!(current.status, OrderStatus::Completed);

        // Cancellation does not restock
        let before = store.item_quantity(&item_id).await.expect("quantity");
        let order = service
            .place_order(request(&item_id, 1, "10.00"))
            .await
            .expect("place");
        let id = order.id.expect("id").to_string();
        let cancelled = service
            .transition_status(&id, OrderStatus::Cancelled)
            .await
            .expect("cancel");
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(
            store.item_quantity(&item_id).await.expect("quantity"),
            before - 1
        );
    }

    #[tokio::test]
    async fn transitions_on_unknown_orders_fail() {
        let (_store, service, _item_id) = setup(1, "10.00").await;
        let err = service
            .transition_status("shop_order:ghost", OrderStatus::Accepted)
            .await
            .expect_err("must fail");
        assert!(matches!(err, PlacementError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_placements_never_oversell() {
        let (store, service, item_id) = setup(5, "10.00").await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let item_id = item_id.clone();
                tokio::spawn(async move { service.place_order(request(&item_id, 1, "10.00")).await })
            })
            .collect();
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.expect("task panicked"))
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 5);
        assert_eq!(store.item_quantity(&item_id).await, Some(0));
        for result in results {
            if let Err(err) = result {
                assert!(
                    matches!(
                        err,
                        PlacementError::InsufficientStock { .. }
                            | PlacementError::StockConflict { .. }
                    ),
                    "unexpected loser error: {err:?}"
                );
            }
        }
    }
}
