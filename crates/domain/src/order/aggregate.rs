//! Order aggregate implementation.

use common::{CustomerId, OrderId};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ValidationError;

use super::{Money, OrderItem};

/// Order aggregate root.
///
/// Owns an ordered collection of [`OrderItem`]s. The total is recomputed
/// from the items on every call so it always reflects their live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
}

impl Entity for Order {
    type Id = OrderId;

    fn entity_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> &OrderId {
        &self.id
    }
}

impl Order {
    /// Creates a new order.
    ///
    /// # Errors
    /// - `IdRequired` if `id` is empty
    /// - `CustomerIdRequired` if `customer_id` is empty
    /// - `ItemsRequired` if `items` is empty
    /// - `InvalidQuantity` if any item has a zero quantity
    pub fn new(
        id: impl Into<OrderId>,
        customer_id: impl Into<CustomerId>,
        items: Vec<OrderItem>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let customer_id = customer_id.into();

        if id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if customer_id.is_empty() {
            return Err(ValidationError::CustomerIdRequired);
        }
        validate_items(&items)?;

        Ok(Self {
            id,
            customer_id,
            items,
        })
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the sum of every item's subtotal.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// Replaces the whole item collection.
    ///
    /// On error the current items are left untouched.
    pub fn change_items(&mut self, items: Vec<OrderItem>) -> Result<(), ValidationError> {
        validate_items(&items)?;
        self.items = items;
        Ok(())
    }
}

fn validate_items(items: &[OrderItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::ItemsRequired);
    }
    if let Some(item) = items.iter().find(|item| item.quantity() == 0) {
        return Err(ValidationError::InvalidQuantity {
            item_id: item.id().to_string(),
        });
    }
    Ok(())
}
