//! Inventory Item Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Inventory item entity (table `item`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Unit of measure shown to customers (bag, can, each, ...)
    pub unit: String,
    /// Stock on hand. Never negative: every mutation is a conditional
    /// single-statement update.
    pub quantity_on_hand: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub unit: String,
    pub quantity_on_hand: Option<i64>,
    pub unit_price: Decimal,
    pub image: Option<String>,
}

/// Partial update; quantity changes go through the conditional
/// restock / set_quantity operations instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub image: Option<String>,
}
