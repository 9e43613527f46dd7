//! Order draft validation and aggregate construction
//!
//! Pure functions: request payload in, validated aggregate out. Nothing here
//! touches storage; the workflow supplies the loaded ledger items for the
//! pricing step. Checks run in a fixed order and the first failure wins.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::db::models::{InventoryItem, Order, OrderLine};
use crate::orders::error::{PlacementError, PlacementResult};
use crate::orders::store::StockDecrement;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
};
use shared::order::{OrderStatus, PlaceOrderRequest};

/// Upper bound per line, matching the ledger's practical scale.
const MAX_LINE_QUANTITY: i64 = 9_999;

/// Structural validation of a placement request. Does not consult the
/// ledger; price-dependent checks happen in [`build_order`].
pub fn validate_request(req: &PlaceOrderRequest) -> PlacementResult<()> {
    if req.line_items.is_empty() {
        return Err(PlacementError::Validation(
            "line_items must not be empty".into(),
        ));
    }
    if req.total_amount < Decimal::ZERO {
        return Err(PlacementError::Validation(
            "total_amount must be non-negative".into(),
        ));
    }
    validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&req.customer_email, "customer_email", MAX_EMAIL_LEN)?;
    if !req.customer_email.contains('@') {
        return Err(PlacementError::Validation(
            "customer_email must be a valid email address".into(),
        ));
    }
    validate_required_text(&req.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

    for (index, line) in req.line_items.iter().enumerate() {
        if line.item_id.trim().is_empty() {
            return Err(PlacementError::Validation(format!(
                "line_items[{index}].item_id must not be empty"
            )));
        }
        if line.quantity < 1 {
            return Err(PlacementError::Validation(format!(
                "line_items[{index}].quantity must be at least 1"
            )));
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(PlacementError::Validation(format!(
                "line_items[{index}].quantity exceeds maximum allowed ({MAX_LINE_QUANTITY})"
            )));
        }
    }
    Ok(())
}

/// Build the aggregate and its decrement set from the loaded ledger items.
///
/// Requested quantities are aggregated per distinct item so duplicate lines
/// cannot each pass a check their combined quantity would fail. Names and
/// unit prices are snapshotted from the ledger; the total is recomputed
/// server-side and a disagreeing client total is rejected.
pub fn build_order(
    req: &PlaceOrderRequest,
    items: &HashMap<String, InventoryItem>,
) -> PlacementResult<(Order, Vec<StockDecrement>)> {
    for line in &req.line_items {
        if !items.contains_key(&line.item_id) {
            return Err(PlacementError::ItemNotFound(line.item_id.clone()));
        }
    }

    // Aggregate per distinct item, preserving first-seen order
    let mut requested: Vec<(String, i64)> = Vec::new();
    for line in &req.line_items {
        match requested.iter_mut().find(|(id, _)| id == &line.item_id) {
            Some((_, quantity)) => *quantity += line.quantity,
            None => requested.push((line.item_id.clone(), line.quantity)),
        }
    }

    // Availability pre-check before any decrement is attempted: a single
    // short item blocks the whole order
    for (item_id, quantity) in &requested {
        let Some(item) = items.get(item_id) else {
            return Err(PlacementError::ItemNotFound(item_id.clone()));
        };
        if item.quantity_on_hand < *quantity {
            return Err(PlacementError::InsufficientStock {
                item_id: item_id.clone(),
                available: item.quantity_on_hand,
                requested: *quantity,
            });
        }
    }

    // Line snapshots and the authoritative total
    let mut lines = Vec::with_capacity(req.line_items.len());
    let mut total = Decimal::ZERO;
    for line in &req.line_items {
        let Some(item) = items.get(&line.item_id) else {
            return Err(PlacementError::ItemNotFound(line.item_id.clone()));
        };
        let line_total = item.unit_price * Decimal::from(line.quantity);
        total += line_total;
        lines.push(OrderLine {
            item_id: line.item_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: line.quantity,
            line_total,
        });
    }

    if req.total_amount != total {
        return Err(PlacementError::Validation(format!(
            "total_amount mismatch: client sent {}, server computed {}",
            req.total_amount, total
        )));
    }

    let decrements = requested
        .into_iter()
        .map(|(item_id, quantity)| StockDecrement { item_id, quantity })
        .collect();

    let order = Order {
        id: None,
        code: String::new(), // attached by the placement loop
        line_items: lines,
        total_amount: total,
        customer_name: req.customer_name.clone(),
        customer_email: req.customer_email.clone(),
        customer_phone: req.customer_phone.clone(),
        delivery_address: req.delivery_address.clone(),
        notes: req.notes.clone(),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
        accepted_at: None,
        completed_at: None,
        cancelled_at: None,
    };
    Ok((order, decrements))
}
