//! Order workflows for the pet-care shop
//!
//! - **draft**: request validation and aggregate construction (pure)
//! - **error**: the error taxonomy shared by both workflows
//! - **service**: the placement workflow and the status workflow
//! - **store**: the storage seam with SurrealDB and in-memory backends
//!
//! # Placement flow
//!
//! ```text
//! PlaceOrderRequest → validate → load items → availability pre-check
//!         → build aggregate (price/name snapshots, server total)
//!         → generate code → atomic commit (guarded decrements + insert)
//!         → Order (status PENDING)
//! ```
//!
//! The pre-check exists for precise error messages; correctness under
//! concurrent placements comes from the per-item guards inside the commit.

pub mod draft;
pub mod error;
pub mod service;
pub mod store;

// Re-exports
pub use error::{PlacementError, PlacementResult};
pub use service::OrderService;
pub use store::{MemoryOrderStore, OrderStore, StockDecrement, SurrealOrderStore};
