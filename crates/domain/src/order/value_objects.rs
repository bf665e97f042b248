//! Value objects for the order domain.

use common::{OrderItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ValidationError;

/// Money amount represented in cents to avoid floating point issues.
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = 10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from whole currency units.
    pub fn from_units(units: i64) -> Self {
        Self {
            cents: units.saturating_mul(100),
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the whole-unit portion.
    pub fn units(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after units).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns the amount in currency units as a float (1050 cents = 10.5).
    pub fn as_units_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Raises the amount by a percentage, rounding half away from zero to
    /// whole cents.
    pub fn increase_by_percent(&self, percentage: f64) -> Money {
        let raised = self.cents as f64 * (1.0 + percentage / 100.0);
        Money {
            cents: raised.round() as i64,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A line in an order.
///
/// Carries a snapshot of the product name and price at the time the line
/// was created, plus a reference to the product it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    name: String,
    price: Money,
    product_id: ProductId,
    quantity: u32,
}

// Stored nested inside its order; the id is unique across all orders.
impl Entity for OrderItem {
    type Id = OrderItemId;

    fn entity_type() -> &'static str {
        "OrderItem"
    }

    fn id(&self) -> &OrderItemId {
        &self.id
    }
}

impl OrderItem {
    /// Creates a new order item.
    ///
    /// # Errors
    /// - `ValidationError::IdRequired` if `id` is empty
    /// - `ValidationError::NameRequired` if `name` is empty
    pub fn new(
        id: impl Into<OrderItemId>,
        name: impl Into<String>,
        price: Money,
        product_id: impl Into<ProductId>,
        quantity: u32,
    ) -> Result<Self, ValidationError> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            price,
            product_id: product_id.into(),
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if self.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        Ok(())
    }

    pub fn id(&self) -> &OrderItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns price * quantity.
    pub fn subtotal(&self) -> Money {
        self.price.multiply(self.quantity)
    }

    /// Changes the quantity in place. Bounds are checked by the owning order.
    pub fn change_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
