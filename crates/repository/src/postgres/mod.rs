//! PostgreSQL-backed repositories.

mod customer;
mod order;
mod product;

pub use customer::PostgresCustomerRepository;
pub use order::PostgresOrderRepository;
pub use product::PostgresProductRepository;

use domain::{Entity, RepositoryError};
use sqlx::PgPool;

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// The three PostgreSQL repositories sharing one connection pool.
#[derive(Clone)]
pub struct PostgresRepositories {
    pub orders: PostgresOrderRepository,
    pub customers: PostgresCustomerRepository,
    pub products: PostgresProductRepository,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: PostgresOrderRepository::new(pool.clone()),
            customers: PostgresCustomerRepository::new(pool.clone()),
            products: PostgresProductRepository::new(pool),
        }
    }
}

/// Wraps a backend error without changing it.
pub(crate) fn storage(err: sqlx::Error) -> RepositoryError {
    tracing::warn!(error = %err, "storage error");
    RepositoryError::storage(err)
}

/// Maps an insert failure, translating a primary key violation on
/// `primary_key` into `AlreadyExists`.
pub(crate) fn insert_error<T: Entity>(
    err: sqlx::Error,
    id: &T::Id,
    primary_key: &str,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.constraint() == Some(primary_key)
    {
        return RepositoryError::already_exists::<T>(id);
    }
    storage(err)
}
