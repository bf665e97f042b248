//! Pricing operations across many products.

use crate::entity::Entity;
use crate::error::ValidationError;

use super::Product;
use super::aggregate::check_price;

/// Stateless service for bulk product changes.
pub struct ProductService;

impl ProductService {
    /// Raises the price of every product by `percentage` percent.
    ///
    /// Prices are rounded to whole cents. A negative percentage lowers
    /// prices.
    ///
    /// # Errors
    /// `NegativePrice` if any product would drop below zero. No product is
    /// changed in that case.
    #[tracing::instrument(skip(products), fields(count = products.len()))]
    pub fn increase_prices(
        products: &mut [Product],
        percentage: f64,
    ) -> Result<(), ValidationError> {
        let mut raised = Vec::with_capacity(products.len());
        for product in products.iter() {
            let price = product.price().increase_by_percent(percentage);
            if let Err(err) = check_price(price) {
                tracing::warn!(product_id = %product.id(), error = %err, "price change rejected");
                return Err(err);
            }
            raised.push(price);
        }

        for (product, price) in products.iter_mut().zip(raised) {
            product.change_price(price)?;
        }
        Ok(())
    }
}
