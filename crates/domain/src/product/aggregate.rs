//! Product entity.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ValidationError;
use crate::order::Money;

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
}

impl Entity for Product {
    type Id = ProductId;

    fn entity_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> &ProductId {
        &self.id
    }
}

impl Product {
    /// Creates a product.
    ///
    /// # Errors
    /// - `IdRequired` / `NameRequired` on empty fields
    /// - `NegativePrice` if `price` is below zero
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let name = name.into();
        if id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        check_price(price)?;
        Ok(Self { id, name, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        self.name = name;
        Ok(())
    }

    pub fn change_price(&mut self, price: Money) -> Result<(), ValidationError> {
        check_price(price)?;
        self.price = price;
        Ok(())
    }
}

pub(crate) fn check_price(price: Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::NegativePrice {
            cents: price.cents(),
        });
    }
    Ok(())
}
