//! Domain error types.

use thiserror::Error;

/// A required field was empty or a precondition was violated.
///
/// Returned synchronously by constructors and mutators; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Id is required")]
    IdRequired,

    #[error("Name is required")]
    NameRequired,

    #[error("CustomerId is required")]
    CustomerIdRequired,

    #[error("Items are required")]
    ItemsRequired,

    /// An order line with a zero quantity.
    #[error("Quantity must be greater than 0 (item {item_id})")]
    InvalidQuantity { item_id: String },

    #[error("Price must not be negative (got {cents} cents)")]
    NegativePrice { cents: i64 },

    #[error("Address is mandatory to activate a customer")]
    AddressRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_field() {
        assert_eq!(ValidationError::IdRequired.to_string(), "Id is required");
        assert_eq!(ValidationError::NameRequired.to_string(), "Name is required");
        assert_eq!(
            ValidationError::AddressRequired.to_string(),
            "Address is mandatory to activate a customer"
        );
    }

    #[test]
    fn invalid_quantity_mentions_item() {
        let err = ValidationError::InvalidQuantity {
            item_id: "oi1".to_string(),
        };
        assert!(err.to_string().contains("oi1"));
    }
}
