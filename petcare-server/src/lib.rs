//! Petcare Shop Server: inventory ledger and order placement core
//!
//! # Module structure
//!
//! ```text
//! petcare-server/src/
//! ├── core/    # configuration, application state
//! ├── db/      # embedded SurrealDB: models + repositories
//! ├── orders/  # placement + status workflows, order store seam
//! └── utils/   # validation limits, logging setup
//! ```
//!
//! The placement workflow never talks to SurrealDB directly: it goes through
//! the [`orders::store::OrderStore`] seam, whose production backend commits
//! every stock decrement and the order insert as one transaction.

pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use crate::core::{AppState, Config};
pub use db::DbService;
pub use orders::{
    MemoryOrderStore, OrderService, OrderStore, PlacementError, PlacementResult, SurrealOrderStore,
};
pub use utils::{init_logger, init_logger_with_file};

// Re-export shared types for convenience
pub use shared::order::{OrderLineInput, OrderStatus, PlaceOrderRequest};
