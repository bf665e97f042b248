//! Order aggregate and related types.

mod aggregate;
mod service;
mod value_objects;

pub use aggregate::Order;
pub use service::OrderService;
pub use value_objects::{Money, OrderItem};
