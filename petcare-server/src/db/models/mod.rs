//! Database models

pub mod item;
pub mod order;
pub mod serde_helpers;

pub use item::{InventoryItem, ItemCreate, ItemUpdate};
pub use order::{Order, OrderLine};
