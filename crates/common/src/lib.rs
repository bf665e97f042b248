//! Shared identifier types for the storefront workspace.

mod types;

pub use types::{CustomerId, OrderId, OrderItemId, ProductId};
