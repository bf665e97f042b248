use std::collections::HashMap;

use async_trait::async_trait;
use domain::{
    Entity, Order, OrderId, OrderItem, OrderItemId, Repository, RepositoryError, RepositoryResult,
};
use futures_util::TryStreamExt;
use sqlx::{PgPool, Postgres, Transaction};

use super::{insert_error, storage};
use crate::models::{OrderItemModel, OrderModel, StorageModel};
use crate::{not_found, record_operation};

/// PostgreSQL-backed order repository.
///
/// Orders live in `orders`, their lines in `order_items`. Every write runs
/// inside a single transaction, and reads see one snapshot. An item id
/// belongs to exactly one order.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Starts a read-only transaction whose statements share one snapshot.
    async fn begin_snapshot(&self) -> RepositoryResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        Ok(tx)
    }

    async fn upsert_items(
        tx: &mut Transaction<'_, Postgres>,
        items: &[OrderItemModel],
    ) -> RepositoryResult<()> {
        for item in items {
            // The WHERE clause leaves rows of other orders alone.
            let result = sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, name, price, quantity, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    product_id = EXCLUDED.product_id,
                    name = EXCLUDED.name,
                    price = EXCLUDED.price,
                    quantity = EXCLUDED.quantity,
                    position = EXCLUDED.position
                WHERE order_items.order_id = EXCLUDED.order_id
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.position)
            .execute(&mut **tx)
            .await
            .map_err(storage)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::already_exists::<OrderItem>(
                    &OrderItemId::new(item.id.as_str()),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Order> for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn create(&self, order: &Order) -> RepositoryResult<()> {
        record_operation(Order::entity_type(), "create");
        let model = OrderModel::from_entity(order);

        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("INSERT INTO orders (id, customer_id, total) VALUES ($1, $2, $3)")
            .bind(&model.id)
            .bind(&model.customer_id)
            .bind(model.total)
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error::<Order>(e, order.id(), "orders_pkey"))?;

        for item in &model.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, name, price, quantity, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.position)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                insert_error::<OrderItem>(e, &OrderItemId::new(item.id.as_str()), "order_items_pkey")
            })?;
        }

        tx.commit().await.map_err(storage)?;
        tracing::debug!(items = model.items.len(), "order created");
        Ok(())
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn update(&self, order: &Order) -> RepositoryResult<()> {
        record_operation(Order::entity_type(), "update");
        let model = OrderModel::from_entity(order);

        let mut tx = self.pool.begin().await.map_err(storage)?;

        let result = sqlx::query("UPDATE orders SET customer_id = $2, total = $3 WHERE id = $1")
            .bind(&model.id)
            .bind(&model.customer_id)
            .bind(model.total)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(not_found::<Order>(order.id()));
        }

        Self::upsert_items(&mut tx, &model.items).await?;

        let kept: Vec<String> = model.items.iter().map(|item| item.id.clone()).collect();
        let removed = sqlx::query("DELETE FROM order_items WHERE order_id = $1 AND id <> ALL($2)")
            .bind(&model.id)
            .bind(&kept)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        tracing::debug!(
            items = model.items.len(),
            removed = removed.rows_affected(),
            "order updated"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &OrderId) -> RepositoryResult<Order> {
        record_operation(Order::entity_type(), "find");
        let mut tx = self.begin_snapshot().await?;

        let row = sqlx::query("SELECT id, customer_id, total FROM orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;

        let Some(row) = row else {
            return Err(not_found::<Order>(id));
        };
        let mut model = OrderModel::from_row(&row).map_err(storage)?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, name, price, quantity, position
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        model.items = item_rows
            .iter()
            .map(OrderItemModel::from_row)
            .collect::<sqlx::Result<_>>()
            .map_err(storage)?;

        model.into_entity()
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        record_operation(Order::entity_type(), "find_all");
        let mut tx = self.begin_snapshot().await?;

        let order_rows = sqlx::query("SELECT id, customer_id, total FROM orders ORDER BY id ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(storage)?;

        let mut items_by_order: HashMap<String, Vec<OrderItemModel>> = HashMap::new();
        let mut item_rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, name, price, quantity, position
            FROM order_items
            ORDER BY order_id ASC, position ASC
            "#,
        )
        .fetch(&mut *tx);

        while let Some(row) = item_rows.try_next().await.map_err(storage)? {
            let item = OrderItemModel::from_row(&row).map_err(storage)?;
            items_by_order
                .entry(item.order_id.clone())
                .or_default()
                .push(item);
        }
        drop(item_rows);
        tx.commit().await.map_err(storage)?;

        order_rows
            .iter()
            .map(|row| {
                let mut model = OrderModel::from_row(row).map_err(storage)?;
                model.items = items_by_order.remove(&model.id).unwrap_or_default();
                model.into_entity()
            })
            .collect()
    }
}
