//! Order lifecycle and request types shared with clients

pub mod types;

pub use types::{OrderLineInput, OrderStatus, PlaceOrderRequest};
