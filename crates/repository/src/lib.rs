//! Storage adapters for the domain repository port.
//!
//! Two backends implement `domain::Repository` for orders, customers and
//! products: an in-memory one and a PostgreSQL one. Both map entities
//! through the models in [`models`].

pub mod models;
mod memory;
pub mod postgres;

use domain::{Entity, RepositoryError};

pub use memory::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryRepository,
};
pub use models::StorageModel;
pub use postgres::{
    PostgresCustomerRepository, PostgresOrderRepository, PostgresProductRepository,
    PostgresRepositories, run_migrations,
};

pub(crate) fn record_operation(entity: &'static str, operation: &'static str) {
    metrics::counter!("repository_operations_total", "entity" => entity, "operation" => operation)
        .increment(1);
}

pub(crate) fn not_found<T: Entity>(id: &T::Id) -> RepositoryError {
    metrics::counter!("repository_not_found_total", "entity" => T::entity_type()).increment(1);
    RepositoryError::not_found::<T>(id)
}
