//! Customer aggregate implementation.

use common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ValidationError;

use super::{Address, CustomerStatus};

/// Customer aggregate root.
///
/// A customer can only be activated once an address is attached. Reward
/// points are awarded by the order service and only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    address: Option<Address>,
    status: CustomerStatus,
    reward_points: f64,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn entity_type() -> &'static str {
        "Customer"
    }

    fn id(&self) -> &CustomerId {
        &self.id
    }
}

impl Customer {
    /// Creates an inactive customer with no address and no reward points.
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Result<Self, ValidationError> {
        let customer = Self {
            id: id.into(),
            name: name.into(),
            address: None,
            status: CustomerStatus::Inactive,
            reward_points: 0.0,
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Rebuilds a customer from previously persisted state.
    ///
    /// Applies the same rules as the mutators: an active customer must have
    /// an address.
    pub fn restore(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        address: Option<Address>,
        status: CustomerStatus,
        reward_points: f64,
    ) -> Result<Self, ValidationError> {
        let customer = Self {
            id: id.into(),
            name: name.into(),
            address,
            status,
            reward_points,
        };
        customer.validate()?;
        if customer.status.is_active() && customer.address.is_none() {
            return Err(ValidationError::AddressRequired);
        }
        Ok(customer)
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn reward_points(&self) -> f64 {
        self.reward_points
    }

    /// Renames the customer. An empty name is rejected and the old name kept.
    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        self.name = name;
        Ok(())
    }

    pub fn change_address(&mut self, address: Address) {
        self.address = Some(address);
    }

    /// Marks the customer active.
    ///
    /// # Errors
    /// `ValidationError::AddressRequired` if no address is attached, whatever
    /// the current status.
    pub fn activate(&mut self) -> Result<(), ValidationError> {
        if self.address.is_none() {
            return Err(ValidationError::AddressRequired);
        }
        self.status = CustomerStatus::Active;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.status = CustomerStatus::Inactive;
    }

    pub fn add_reward_points(&mut self, points: f64) {
        self.reward_points += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address::new("Street 1", 123, "13330-250", "Sao Paulo")
    }

    #[test]
    fn test_new_requires_id() {
        assert_eq!(
            Customer::new("", "John").unwrap_err(),
            ValidationError::IdRequired
        );
    }

    #[test]
    fn test_new_requires_name() {
        assert_eq!(
            Customer::new("123", "").unwrap_err(),
            ValidationError::NameRequired
        );
    }

    #[test]
    fn test_new_customer_is_inactive() {
        let customer = Customer::new("123", "John").unwrap();
        assert!(!customer.is_active());
        assert_eq!(customer.reward_points(), 0.0);
        assert!(customer.address().is_none());
    }

    #[test]
    fn test_change_name() {
        let mut customer = Customer::new("123", "John").unwrap();
        customer.change_name("Jane").unwrap();
        assert_eq!(customer.name(), "Jane");
    }

    #[test]
    fn test_change_name_rejects_empty() {
        let mut customer = Customer::new("123", "John").unwrap();
        assert_eq!(
            customer.change_name("").unwrap_err(),
            ValidationError::NameRequired
        );
        assert_eq!(customer.name(), "John");
    }

    #[test]
    fn test_activate_with_address() {
        let mut customer = Customer::new("123", "John").unwrap();
        customer.change_address(address());
        customer.activate().unwrap();
        assert!(customer.is_active());
    }

    #[test]
    fn test_activate_without_address_fails() {
        let mut customer = Customer::new("123", "John").unwrap();
        assert_eq!(
            customer.activate().unwrap_err(),
            ValidationError::AddressRequired
        );
        assert!(!customer.is_active());
    }

    #[test]
    fn test_deactivate_and_reactivate() {
        let mut customer = Customer::new("123", "John").unwrap();
        customer.change_address(address());
        customer.activate().unwrap();

        customer.deactivate();
        assert!(!customer.is_active());

        customer.activate().unwrap();
        assert!(customer.is_active());
    }

    #[test]
    fn test_deactivate_is_unconditional() {
        let mut customer = Customer::new("123", "John").unwrap();
        customer.deactivate();
        assert!(!customer.is_active());
    }

    #[test]
    fn test_reward_points_accumulate() {
        let mut customer = Customer::new("123", "John").unwrap();
        customer.add_reward_points(10.0);
        assert_eq!(customer.reward_points(), 10.0);
        customer.add_reward_points(10.0);
        assert_eq!(customer.reward_points(), 20.0);
    }

    #[test]
    fn test_restore_active_requires_address() {
        let err = Customer::restore("123", "John", None, CustomerStatus::Active, 0.0).unwrap_err();
        assert_eq!(err, ValidationError::AddressRequired);

        let customer =
            Customer::restore("123", "John", Some(address()), CustomerStatus::Active, 7.5)
                .unwrap();
        assert!(customer.is_active());
        assert_eq!(customer.reward_points(), 7.5);
    }
}
