//! Order service for rules spanning orders and customers.

use common::OrderId;

use crate::customer::Customer;
use crate::entity::Entity;
use crate::error::ValidationError;

use super::{Money, Order, OrderItem};

/// One reward point is earned per this many currency units spent.
const UNITS_PER_REWARD_POINT: f64 = 2.0;

/// Stateless domain service for operations spanning several aggregates.
///
/// Nothing here touches storage: callers persist the returned order and the
/// mutated customer themselves.
pub struct OrderService;

impl OrderService {
    /// Places an order for `customer` and awards reward points.
    ///
    /// The new order gets a generated id. The customer earns half the order
    /// total (in currency units) as reward points.
    ///
    /// # Errors
    /// Any `ValidationError` raised while building the order; the customer
    /// is left untouched in that case.
    #[tracing::instrument(skip(customer, items), fields(customer_id = %customer.id(), items = items.len()))]
    pub fn place_order(
        customer: &mut Customer,
        items: Vec<OrderItem>,
    ) -> Result<Order, ValidationError> {
        let order = Order::new(OrderId::generate(), customer.id().clone(), items)?;

        let points = order.total().as_units_f64() / UNITS_PER_REWARD_POINT;
        customer.add_reward_points(points);

        metrics::counter!("orders_placed_total").increment(1);
        metrics::histogram!("reward_points_awarded").record(points);
        tracing::debug!(order_id = %order.id(), total = %order.total(), points, "order placed");

        Ok(order)
    }

    /// Returns the sum of the totals of `orders`; zero when empty.
    pub fn total<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Money {
        orders.into_iter().map(Order::total).sum()
    }
}
