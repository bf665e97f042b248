//! Persistence port for entities.
//!
//! The domain only depends on these traits. Adapters (in-memory, PostgreSQL)
//! live in the `repository` crate and own all storage naming.

use async_trait::async_trait;
use thiserror::Error;

use crate::customer::Customer;
use crate::entity::Entity;
use crate::error::ValidationError;
use crate::order::Order;
use crate::product::Product;

/// Boxed backend error kept as the source of `RepositoryError::Storage`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No stored entity matches the id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// `create` was called for an id that is already stored.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Stored data could not be rebuilt into a valid entity.
    #[error("Invalid stored data: {0}")]
    Invalid(#[from] ValidationError),

    /// Any other backend failure, passed through unchanged.
    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),
}

impl RepositoryError {
    pub fn not_found<T: Entity>(id: &T::Id) -> Self {
        Self::NotFound {
            entity: T::entity_type(),
            id: id.to_string(),
        }
    }

    pub fn already_exists<T: Entity>(id: &T::Id) -> Self {
        Self::AlreadyExists {
            entity: T::entity_type(),
            id: id.to_string(),
        }
    }

    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Create/update/find/find_all contract shared by every entity type.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Persists a new entity including any nested items.
    ///
    /// Fails with `AlreadyExists` if the id is already stored.
    async fn create(&self, entity: &T) -> RepositoryResult<()>;

    /// Persists changes to an existing entity.
    ///
    /// Nested items are upserted by id; items no longer present on the
    /// entity are removed. The whole write is atomic. Fails with `NotFound`
    /// if the entity was never created.
    async fn update(&self, entity: &T) -> RepositoryResult<()>;

    /// Rebuilds one entity, nested items included.
    ///
    /// Fails with `NotFound` when nothing is stored under `id`.
    async fn find(&self, id: &T::Id) -> RepositoryResult<T>;

    /// Rebuilds every stored entity of this type, ordered by id.
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;
}

/// Repository for [`Order`] aggregates.
pub trait OrderRepository: Repository<Order> {}
impl<R: Repository<Order> + ?Sized> OrderRepository for R {}

/// Repository for [`Customer`] aggregates.
pub trait CustomerRepository: Repository<Customer> {}
impl<R: Repository<Customer> + ?Sized> CustomerRepository for R {}

/// Repository for [`Product`] reference data.
pub trait ProductRepository: Repository<Product> {}
impl<R: Repository<Product> + ?Sized> ProductRepository for R {}
