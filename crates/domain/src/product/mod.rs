//! Product reference data and pricing service.

mod aggregate;
mod service;

pub use aggregate::Product;
pub use service::ProductService;
