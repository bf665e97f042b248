//! Value objects for the customer domain.

use serde::{Deserialize, Serialize};

/// Postal address attached to a customer.
///
/// Immutable once built; change it by giving the customer a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    street: String,
    number: u32,
    zipcode: String,
    city: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        number: u32,
        zipcode: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number,
            zipcode: zipcode.into(),
            city: city.into(),
        }
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Activation state of a customer.
///
/// Customers start inactive and may toggle indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Inactive,
    Active,
}

impl CustomerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for CustomerStatus {
    fn from(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}
