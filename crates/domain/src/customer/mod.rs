//! Customer aggregate and related types.

mod aggregate;
mod value_objects;

pub use aggregate::Customer;
pub use value_objects::{Address, CustomerStatus};
