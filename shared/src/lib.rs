//! Shared types for the pet-care shop platform
//!
//! Types and helpers used by the server and any client that talks to it:
//!
//! - **order**: order status lifecycle and the place-order request payload
//! - **util**: clock helpers and the external order code generator

pub mod order;
pub mod util;

pub use order::{OrderLineInput, OrderStatus, PlaceOrderRequest};
pub use util::{is_valid_order_code, now_millis, order_code};
