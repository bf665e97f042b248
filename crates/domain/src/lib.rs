//! Domain layer for the storefront.
//!
//! This crate provides:
//! - Entities with validated construction (`Customer`, `Order`, `Product`)
//! - Domain services spanning aggregates (`OrderService`, `ProductService`)
//! - The repository port adapters implement

pub mod customer;
pub mod entity;
pub mod error;
pub mod order;
pub mod product;
pub mod repository;

pub use common::{CustomerId, OrderId, OrderItemId, ProductId};
pub use customer::{Address, Customer, CustomerStatus};
pub use entity::Entity;
pub use error::ValidationError;
pub use order::{Money, Order, OrderItem, OrderService};
pub use product::{Product, ProductService};
pub use repository::{
    BoxError, CustomerRepository, OrderRepository, ProductRepository, Repository,
    RepositoryError, RepositoryResult,
};
