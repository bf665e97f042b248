use async_trait::async_trait;
use domain::{Customer, CustomerId, Entity, Repository, RepositoryResult};
use sqlx::PgPool;

use super::{insert_error, storage};
use crate::models::{CustomerModel, StorageModel};
use crate::{not_found, record_operation};

/// PostgreSQL-backed customer repository.
#[derive(Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Customer> for PostgresCustomerRepository {
    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id()))]
    async fn create(&self, customer: &Customer) -> RepositoryResult<()> {
        record_operation(Customer::entity_type(), "create");
        let model = CustomerModel::from_entity(customer);

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, street, number, zipcode, city, active, reward_points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&model.id)
        .bind(&model.name)
        .bind(&model.street)
        .bind(model.number)
        .bind(&model.zipcode)
        .bind(&model.city)
        .bind(model.active)
        .bind(model.reward_points)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error::<Customer>(e, customer.id(), "customers_pkey"))?;

        tracing::debug!("customer created");
        Ok(())
    }

    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id()))]
    async fn update(&self, customer: &Customer) -> RepositoryResult<()> {
        record_operation(Customer::entity_type(), "update");
        let model = CustomerModel::from_entity(customer);

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, street = $3, number = $4, zipcode = $5, city = $6,
                active = $7, reward_points = $8
            WHERE id = $1
            "#,
        )
        .bind(&model.id)
        .bind(&model.name)
        .bind(&model.street)
        .bind(model.number)
        .bind(&model.zipcode)
        .bind(&model.city)
        .bind(model.active)
        .bind(model.reward_points)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Customer>(customer.id()));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &CustomerId) -> RepositoryResult<Customer> {
        record_operation(Customer::entity_type(), "find");

        let row = sqlx::query(
            r#"
            SELECT id, name, street, number, zipcode, city, active, reward_points
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => CustomerModel::from_row(&row).map_err(storage)?.into_entity(),
            None => Err(not_found::<Customer>(id)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        record_operation(Customer::entity_type(), "find_all");

        let rows = sqlx::query(
            r#"
            SELECT id, name, street, number, zipcode, city, active, reward_points
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter()
            .map(|row| CustomerModel::from_row(row).map_err(storage)?.into_entity())
            .collect()
    }
}
