//! Order Model
//!
//! Orders are immutable once created except for status and the
//! status-transition timestamps.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::OrderStatus;
use surrealdb::RecordId;

// =============================================================================
// Order Line (embedded)
// =============================================================================

/// Line snapshot recorded at order time. Name and unit price are copies of
/// the ledger state when the order was placed and never change afterwards,
/// even if the item is later repriced or renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    /// Referenced inventory item, `"item:key"` form
    pub item_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    /// unit_price * quantity, recorded at order time
    pub line_total: Decimal,
}

// =============================================================================
// Order
// =============================================================================

/// Order aggregate (table `shop_order`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// External order code shown to customers; unique across all orders
    pub code: String,
    pub line_items: Vec<OrderLine>,
    /// Sum of line totals, always computed server-side
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}
