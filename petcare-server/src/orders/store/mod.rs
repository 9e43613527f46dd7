//! Order store seam
//!
//! The storage boundary behind the order workflows: loading ledger items,
//! committing all stock decrements together with the order insert as one
//! unit, and post-creation reads and status updates.
//!
//! Two backends exist: [`SurrealOrderStore`] runs against the embedded
//! SurrealDB and is what production uses; [`MemoryOrderStore`] mirrors its
//! semantics in memory for tests and embedders that do not need
//! persistence. The workflow code never knows which one it is talking to.

pub mod memory;
pub mod surreal;

pub use memory::MemoryOrderStore;
pub use surreal::SurrealOrderStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::models::{InventoryItem, Order};
use shared::order::OrderStatus;

/// Infrastructure-level store failure. Business outcomes (missing records,
/// failed guards) are modelled in return types, never here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<crate::db::repository::RepoError> for StoreError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Failure of the atomic placement commit. Whatever the variant, the
/// transaction left no effects behind.
#[derive(Debug, Error)]
pub enum CommitError {
    /// A conditional decrement found its guard violated at commit time;
    /// the failing item is named, never inferred from an aggregate count
    #[error("Stock changed for item {item_id} during commit")]
    StockConflict { item_id: String },

    /// The order code collided with an existing order
    #[error("Order code already exists: {code}")]
    DuplicateCode { code: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One stock decrement to apply inside the placement transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    /// Item id in `"item:key"` form
    pub item_id: String,
    pub quantity: i64,
}

/// Storage seam for the order workflows.
///
/// `commit_placement` is the transactional scope of order placement: every
/// decrement is individually guarded, the order insert rides the same
/// transaction, and the whole unit commits or aborts together.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Load the referenced ledger items. Ids that do not resolve are simply
    /// absent from the result; the caller reports them.
    async fn load_items(&self, ids: &[String]) -> Result<Vec<InventoryItem>, StoreError>;

    /// Atomically apply every decrement and persist the order. On any
    /// failure nothing is visible to other readers.
    async fn commit_placement(
        &self,
        decrements: &[StockDecrement],
        order: &Order,
    ) -> Result<Order, CommitError>;

    async fn get_order(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    async fn find_order_by_code(&self, code: &str) -> Result<Option<Order>, StoreError>;

    /// All orders, most recent first.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Orders in one lifecycle state, most recent first.
    async fn list_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError>;

    /// Conditional status update: applies only while the stored status still
    /// equals `from`, stamping the transition timestamp. None means the
    /// guard failed (lost race) or the order does not exist.
    async fn update_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, StoreError>;
}
