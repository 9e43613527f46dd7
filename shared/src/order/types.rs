//! Shared order types
//!
//! The status lifecycle and the payload a client submits to place an order.
//! Everything here is storage-agnostic; the server owns the persisted
//! aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, stock committed, awaiting acceptance
    #[default]
    Pending,
    /// Acknowledged by the shop
    Accepted,
    /// Fulfilled (terminal)
    Completed,
    /// Cancelled before fulfilment (terminal); stock is NOT returned
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Transition table: pending → accepted | completed | cancelled,
    /// accepted → completed. The pending → completed shortcut serves
    /// walk-in fulfilment where acceptance is implicit.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Accepted) | (Pending, Completed) | (Pending, Cancelled) | (Accepted, Completed)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        })
    }
}

// ============================================================================
// Place Order Request
// ============================================================================

/// One requested line: which item and how many units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLineInput {
    /// Inventory item id, `"item:xyz"` form
    pub item_id: String,
    /// Requested quantity, must be >= 1
    pub quantity: i64,
}

/// Payload a client submits to place an order.
///
/// `total_amount` is advisory: the server recomputes the total from ledger
/// price snapshots and rejects the request when the two disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub line_items: Vec<OrderLineInput>,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
