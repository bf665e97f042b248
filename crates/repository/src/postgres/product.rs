use async_trait::async_trait;
use domain::{Entity, Product, ProductId, Repository, RepositoryResult};
use sqlx::PgPool;

use super::{insert_error, storage};
use crate::models::{ProductModel, StorageModel};
use crate::{not_found, record_operation};

/// PostgreSQL-backed product repository. Prices are stored in cents.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Product> for PostgresProductRepository {
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    async fn create(&self, product: &Product) -> RepositoryResult<()> {
        record_operation(Product::entity_type(), "create");
        let model = ProductModel::from_entity(product);

        sqlx::query("INSERT INTO products (id, name, price) VALUES ($1, $2, $3)")
            .bind(&model.id)
            .bind(&model.name)
            .bind(model.price)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error::<Product>(e, product.id(), "products_pkey"))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    async fn update(&self, product: &Product) -> RepositoryResult<()> {
        record_operation(Product::entity_type(), "update");
        let model = ProductModel::from_entity(product);

        let result = sqlx::query("UPDATE products SET name = $2, price = $3 WHERE id = $1")
            .bind(&model.id)
            .bind(&model.name)
            .bind(model.price)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Product>(product.id()));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &ProductId) -> RepositoryResult<Product> {
        record_operation(Product::entity_type(), "find");

        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        match row {
            Some(row) => ProductModel::from_row(&row).map_err(storage)?.into_entity(),
            None => Err(not_found::<Product>(id)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        record_operation(Product::entity_type(), "find_all");

        let rows = sqlx::query("SELECT id, name, price FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter()
            .map(|row| ProductModel::from_row(row).map_err(storage)?.into_entity())
            .collect()
    }
}
