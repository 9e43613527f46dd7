//! In-memory order store
//!
//! Mirrors the SurrealDB store's semantics: all decrements and the order
//! insert apply together under one lock or not at all. Used by unit tests
//! and by embedders that do not need persistence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::RecordId;
use tokio::sync::Mutex;

use super::{CommitError, OrderStore, StockDecrement, StoreError};
use crate::db::models::{InventoryItem, Order};
use shared::order::OrderStatus;

#[derive(Default)]
struct MemoryState {
    /// item id string -> item
    items: HashMap<String, InventoryItem>,
    /// order id string -> order
    orders: HashMap<String, Order>,
}

#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<MemoryState>>,
    next_key: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item, assigning a record id when absent; returns the id.
    pub async fn put_item(&self, mut item: InventoryItem) -> String {
        let mut state = self.state.lock().await;
        let id = match &item.id {
            Some(rid) => rid.to_string(),
            None => {
                let key = self.next_key.fetch_add(1, Ordering::Relaxed) + 1;
                let rid = RecordId::from_table_key("item", format!("mem{key}"));
                item.id = Some(rid.clone());
                rid.to_string()
            }
        };
        state.items.insert(id.clone(), item);
        id
    }

    pub async fn item_quantity(&self, id: &str) -> Option<i64> {
        let state = self.state.lock().await;
        state.items.get(id).map(|item| item.quantity_on_hand)
    }

    pub async fn order_count(&self) -> usize {
        let state = self.state.lock().await;
        state.orders.len()
    }

    /// Make every subsequent call fail with `Unavailable` (test hook for the
    /// infrastructure-fault path).
    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::Relaxed);
    }

    fn guard(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn load_items(&self, ids: &[String]) -> Result<Vec<InventoryItem>, StoreError> {
        self.guard()?;
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.items.get(id).cloned())
            .collect())
    }

    async fn commit_placement(
        &self,
        decrements: &[StockDecrement],
        order: &Order,
    ) -> Result<Order, CommitError> {
        self.guard()?;
        let mut state = self.state.lock().await;

        if state.orders.values().any(|o| o.code == order.code) {
            return Err(CommitError::DuplicateCode {
                code: order.code.clone(),
            });
        }

        // Check every guard before touching anything; no partial effects
        for decrement in decrements {
            let available = state
                .items
                .get(&decrement.item_id)
                .map(|item| item.quantity_on_hand)
                .unwrap_or(0);
            if available < decrement.quantity {
                return Err(CommitError::StockConflict {
                    item_id: decrement.item_id.clone(),
                });
            }
        }
        for decrement in decrements {
            if let Some(item) = state.items.get_mut(&decrement.item_id) {
                item.quantity_on_hand -= decrement.quantity;
            }
        }

        let key = self.next_key.fetch_add(1, Ordering::Relaxed) + 1;
        let rid = RecordId::from_table_key("shop_order", format!("mem{key}"));
        let mut created = order.clone();
        created.id = Some(rid.clone());
        state.orders.insert(rid.to_string(), created.clone());
        Ok(created)
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        self.guard()?;
        let state = self.state.lock().await;
        Ok(state.orders.get(order_id).cloned())
    }

    async fn find_order_by_code(&self, code: &str) -> Result<Option<Order>, StoreError> {
        self.guard()?;
        let state = self.state.lock().await;
        Ok(state.orders.values().find(|o| o.code == code).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.guard()?;
        let state = self.state.lock().await;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        self.guard()?;
        let state = self.state.lock().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, StoreError> {
        self.guard()?;
        let mut state = self.state.lock().await;
        match state.orders.get_mut(order_id) {
            Some(order) if order.status == from => {
                order.status = to;
                match to {
                    OrderStatus::Accepted => order.accepted_at = Some(at),
                    OrderStatus::Completed => order.completed_at = Some(at),
                    OrderStatus::Cancelled => order.cancelled_at = Some(at),
                    OrderStatus::Pending => {}
                }
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }
}
