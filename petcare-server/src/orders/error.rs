//! Order workflow errors

use crate::orders::store::StoreError;
use shared::order::OrderStatus;
use thiserror::Error;

/// Errors surfaced by the placement and status workflows.
///
/// Business rejections (`Validation`, `ItemNotFound`, `InsufficientStock`,
/// `InvalidTransition`) mean the caller should change the request;
/// infrastructure faults (`StorageUnavailable`, `OrderCodeExhausted`) are
/// safe to retry with backoff; `StockConflict` means retry the whole
/// placement from scratch.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Malformed or incomplete request; storage was never mutated
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Pre-check rejection: requested more than is on hand
    #[error("Insufficient stock for {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// A concurrent transaction changed stock between the pre-check and the
    /// commit; quantities for other items may have changed too, so the whole
    /// placement must be retried
    #[error("Stock changed concurrently for {item_id}; retry the order")]
    StockConflict { item_id: String },

    /// Code-generation retry budget exhausted (transient fault)
    #[error("Order code retries exhausted")]
    OrderCodeExhausted,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Infrastructure fault; the transaction was not committed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl PlacementError {
    /// Infrastructure faults warrant an automatic retry with backoff;
    /// everything else needs a changed request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            PlacementError::StorageUnavailable(_) | PlacementError::OrderCodeExhausted
        )
    }
}

impl From<StoreError> for PlacementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => PlacementError::StorageUnavailable(msg),
        }
    }
}

pub type PlacementResult<T> = Result<T, PlacementError>;
