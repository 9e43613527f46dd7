//! SurrealDB-backed order store
//!
//! The placement commit is one multi-statement transaction: each stock
//! decrement is its own guarded update whose failure THROWs a marker naming
//! the item, which cancels the whole transaction; the order insert rides the
//! same transaction under the UNIQUE code index. Response errors are
//! classified back into tagged outcomes by marker / index-name substring.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{CommitError, OrderStore, StockDecrement, StoreError};
use crate::db::models::{InventoryItem, Order};
use crate::db::repository::item::ITEM_TABLE;
use crate::db::repository::{parse_record_id, ItemRepository, OrderRepository, RepoError};
use shared::order::OrderStatus;

/// Marker embedded in THROW messages by the placement transaction.
const STOCK_CONFLICT_MARKER: &str = "stock_conflict:";
/// Name of the unique index protecting the order code column.
const ORDER_CODE_INDEX: &str = "order_code_idx";

#[derive(Clone)]
pub struct SurrealOrderStore {
    db: Surreal<Db>,
    items: ItemRepository,
    orders: OrderRepository,
}

impl SurrealOrderStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            items: ItemRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            db,
        }
    }

    /// Build the placement transaction for `count` decrements.
    ///
    /// Every update carries its own guard and its own THROW so the failing
    /// item is named directly; success is never inferred from an aggregate
    /// matched-row count.
    fn placement_query(count: usize) -> String {
        let mut q = String::from("BEGIN TRANSACTION;\n");
        for i in 0..count {
            q.push_str(&format!(
                "LET $updated{i} = (UPDATE $item{i} SET quantity_on_hand -= $qty{i} WHERE quantity_on_hand >= $qty{i});\n\
                 IF array::len($updated{i}) = 0 {{ THROW \"{STOCK_CONFLICT_MARKER}\" + <string>$item{i} }};\n"
            ));
        }
        q.push_str("CREATE shop_order CONTENT $order;\nCOMMIT TRANSACTION;");
        q
    }

    /// Classify a cancelled placement transaction from its error text.
    fn classify_commit_error(messages: &[String], code: &str) -> CommitError {
        for message in messages {
            if let Some(pos) = message.find(STOCK_CONFLICT_MARKER) {
                let item_id = message[pos + STOCK_CONFLICT_MARKER.len()..]
                    .split(|c: char| c == '\'' || c == '"' || c.is_whitespace())
                    .next()
                    .unwrap_or_default()
                    .to_string();
                return CommitError::StockConflict { item_id };
            }
        }
        if messages.iter().any(|m| m.contains(ORDER_CODE_INDEX)) {
            return CommitError::DuplicateCode {
                code: code.to_string(),
            };
        }
        CommitError::Store(StoreError::Unavailable(messages.join("; ")))
    }
}

#[async_trait]
impl OrderStore for SurrealOrderStore {
    async fn load_items(&self, ids: &[String]) -> Result<Vec<InventoryItem>, StoreError> {
        // Ids that do not parse as item records cannot exist; skip them and
        // let the caller report them as missing.
        let parseable: Vec<String> = ids
            .iter()
            .filter(|id| parse_record_id(ITEM_TABLE, id.as_str()).is_ok())
            .cloned()
            .collect();
        Ok(self.items.find_by_ids(&parseable).await?)
    }

    async fn commit_placement(
        &self,
        decrements: &[StockDecrement],
        order: &Order,
    ) -> Result<Order, CommitError> {
        let mut query = self.db.query(Self::placement_query(decrements.len()));
        for (i, decrement) in decrements.iter().enumerate() {
            let rid: RecordId = decrement.item_id.parse().map_err(|_| {
                CommitError::Store(StoreError::Unavailable(format!(
                    "Invalid item id reached commit: {}",
                    decrement.item_id
                )))
            })?;
            query = query
                .bind((format!("item{i}"), rid))
                .bind((format!("qty{i}"), decrement.quantity));
        }
        let mut content = order.clone();
        content.id = None; // the store assigns the record id
        query = query.bind(("order", content));

        let mut response = match query.await {
            Ok(response) => response,
            Err(e) => {
                return Err(Self::classify_commit_error(
                    &[e.to_string()],
                    &order.code,
                ))
            }
        };

        let errors = response.take_errors();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.values().map(|e| e.to_string()).collect();
            return Err(Self::classify_commit_error(&messages, &order.code));
        }

        // Re-read by code rather than fishing the CREATE result out of the
        // statement list; the code is unique by index.
        match self.orders.find_by_code(&order.code).await {
            Ok(Some(created)) => Ok(created),
            Ok(None) => Err(CommitError::Store(StoreError::Unavailable(
                "Committed order not readable".into(),
            ))),
            Err(e) => Err(CommitError::Store(e.into())),
        }
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        match self.orders.find_by_id(order_id).await {
            Ok(found) => Ok(found),
            // A malformed id cannot name an existing order
            Err(RepoError::Validation(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_order_by_code(&self, code: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.find_by_code(code).await?)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.find_all().await?)
    }

    async fn list_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.find_by_status(status).await?)
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, StoreError> {
        match self.orders.update_status(order_id, from, to, at).await {
            Ok(updated) => Ok(updated),
            Err(RepoError::Validation(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
