//! Checkout use case.

use domain::{CustomerId, Entity, Money, Order, OrderItem, OrderService, Repository};

use crate::{AppError, Repositories};

/// Places orders for stored customers and persists the outcome.
#[derive(Clone)]
pub struct Checkout {
    repositories: Repositories,
}

impl Checkout {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Loads the customer, places the order and stores both.
    ///
    /// The order is created before the customer's reward points are saved.
    /// The two writes are not atomic: if the customer update fails the order
    /// is still stored.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn place_order(
        &self,
        customer_id: &CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Order, AppError> {
        let result = self.try_place_order(customer_id, items).await;
        if let Err(err) = &result {
            metrics::counter!("checkout_failures_total").increment(1);
            tracing::warn!(error = %err, "checkout failed");
        }
        result
    }

    async fn try_place_order(
        &self,
        customer_id: &CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Order, AppError> {
        let mut customer = self.repositories.customers.find(customer_id).await?;
        let order = OrderService::place_order(&mut customer, items)?;

        self.repositories.orders.create(&order).await?;
        self.repositories.customers.update(&customer).await?;

        tracing::info!(
            order_id = %order.id(),
            total = %order.total(),
            reward_points = customer.reward_points(),
            "order placed"
        );
        Ok(order)
    }

    /// Sums the totals of every stored order placed by `customer_id`.
    #[tracing::instrument(skip(self))]
    pub async fn customer_spend(&self, customer_id: &CustomerId) -> Result<Money, AppError> {
        let orders = self.repositories.orders.find_all().await?;
        Ok(OrderService::total(
            orders.iter().filter(|order| order.customer_id() == customer_id),
        ))
    }
}
