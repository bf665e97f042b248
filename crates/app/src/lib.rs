//! Application wiring for the storefront.
//!
//! Picks a repository backend from [`Config`], sets up tracing, and exposes
//! the checkout use case that ties customers and orders together.

pub mod checkout;
pub mod config;
pub mod error;
pub mod telemetry;

use std::sync::Arc;

use domain::{CustomerRepository, OrderRepository, ProductRepository};
use repository::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
    PostgresRepositories, run_migrations,
};
use sqlx::postgres::PgPoolOptions;

pub use checkout::Checkout;
pub use config::{Config, ConfigError, LogFormat};
pub use error::AppError;
pub use telemetry::init_tracing;

/// The repositories behind the port traits, whichever backend is in use.
#[derive(Clone)]
pub struct Repositories {
    pub orders: Arc<dyn OrderRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub products: Arc<dyn ProductRepository>,
}

impl Repositories {
    /// Creates empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            orders: Arc::new(InMemoryOrderRepository::new()),
            customers: Arc::new(InMemoryCustomerRepository::new()),
            products: Arc::new(InMemoryProductRepository::new()),
        }
    }

    /// Builds the repositories for `config`.
    ///
    /// Without a `database_url` this is [`Repositories::in_memory`].
    /// Otherwise it connects to PostgreSQL and runs the migrations first.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::info!("DATABASE_URL not set, using in-memory repositories");
            return Ok(Self::in_memory());
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await?;
        run_migrations(&pool).await?;

        tracing::info!(
            max_connections = config.max_connections,
            "connected to PostgreSQL"
        );
        Ok(PostgresRepositories::new(pool).into())
    }
}

impl From<PostgresRepositories> for Repositories {
    fn from(repos: PostgresRepositories) -> Self {
        Self {
            orders: Arc::new(repos.orders),
            customers: Arc::new(repos.customers),
            products: Arc::new(repos.products),
        }
    }
}
