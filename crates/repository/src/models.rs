//! Storage models.
//!
//! These structs mirror the table layout (`customer_id`, `product_id`,
//! `order_id`, `reward_points`, ...). They are the only place where domain
//! entities and storage naming meet; both adapters go through them.

use domain::{
    Address, Customer, CustomerStatus, Entity, Money, Order, OrderItem, OrderItemId, Product,
    RepositoryError, RepositoryResult,
};
use sqlx::{Row, postgres::PgRow};

/// Conversion between a domain entity and its stored representation.
pub trait StorageModel: Clone + Send + Sync + 'static {
    /// The entity this model stores.
    type Entity: Entity;

    /// Primary key value.
    fn key(&self) -> &str;

    fn from_entity(entity: &Self::Entity) -> Self;

    /// Rebuilds the entity, re-running its validation.
    fn into_entity(self) -> RepositoryResult<Self::Entity>;

    /// Fails if a nested row of `self` is already owned by `other`.
    fn check_nested(&self, _other: &Self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Row in `customers`. Address columns are all set or all null.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerModel {
    pub id: String,
    pub name: String,
    pub street: Option<String>,
    pub number: Option<i64>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub reward_points: f64,
}

impl StorageModel for CustomerModel {
    type Entity = Customer;

    fn key(&self) -> &str {
        &self.id
    }

    fn from_entity(customer: &Customer) -> Self {
        let address = customer.address();
        Self {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            street: address.map(|a| a.street().to_string()),
            number: address.map(|a| i64::from(a.number())),
            zipcode: address.map(|a| a.zipcode().to_string()),
            city: address.map(|a| a.city().to_string()),
            active: customer.is_active(),
            reward_points: customer.reward_points(),
        }
    }

    fn into_entity(self) -> RepositoryResult<Customer> {
        let address = match (self.street, self.number, self.zipcode, self.city) {
            (Some(street), Some(number), Some(zipcode), Some(city)) => {
                Some(Address::new(street, to_u32(number)?, zipcode, city))
            }
            _ => None,
        };

        Ok(Customer::restore(
            self.id,
            self.name,
            address,
            CustomerStatus::from(self.active),
            self.reward_points,
        )?)
    }
}

impl CustomerModel {
    pub(crate) fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            zipcode: row.try_get("zipcode")?,
            city: row.try_get("city")?,
            active: row.try_get("active")?,
            reward_points: row.try_get("reward_points")?,
        })
    }
}

/// Row in `products`. Prices are stored in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductModel {
    pub id: String,
    pub name: String,
    pub price: i64,
}

impl StorageModel for ProductModel {
    type Entity = Product;

    fn key(&self) -> &str {
        &self.id
    }

    fn from_entity(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            price: product.price().cents(),
        }
    }

    fn into_entity(self) -> RepositoryResult<Product> {
        Ok(Product::new(self.id, self.name, Money::from_cents(self.price))?)
    }
}

impl ProductModel {
    pub(crate) fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
        })
    }
}

/// Row in `orders` together with its `order_items` rows.
///
/// `total` is a derived column written on every save; it is never read back
/// into the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderModel {
    pub id: String,
    pub customer_id: String,
    pub total: i64,
    pub items: Vec<OrderItemModel>,
}

/// Row in `order_items`. `position` keeps the aggregate's item order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemModel {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub position: i32,
}

impl StorageModel for OrderModel {
    type Entity = Order;

    fn key(&self) -> &str {
        &self.id
    }

    fn from_entity(order: &Order) -> Self {
        let order_id = order.id().to_string();
        let items = order
            .items()
            .iter()
            .enumerate()
            .map(|(position, item)| OrderItemModel {
                id: item.id().to_string(),
                order_id: order_id.clone(),
                product_id: item.product_id().to_string(),
                name: item.name().to_string(),
                price: item.price().cents(),
                quantity: i64::from(item.quantity()),
                position: position as i32,
            })
            .collect();

        Self {
            id: order_id,
            customer_id: order.customer_id().to_string(),
            total: order.total().cents(),
            items,
        }
    }

    fn into_entity(mut self) -> RepositoryResult<Order> {
        self.items.sort_by_key(|item| item.position);
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(OrderItem::new(
                    item.id,
                    item.name,
                    Money::from_cents(item.price),
                    item.product_id,
                    to_u32(item.quantity)?,
                )?)
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Order::new(self.id, self.customer_id, items)?)
    }

    fn check_nested(&self, other: &Self) -> RepositoryResult<()> {
        match self
            .items
            .iter()
            .find(|item| other.items.iter().any(|owned| owned.id == item.id))
        {
            Some(item) => Err(RepositoryError::already_exists::<OrderItem>(
                &OrderItemId::new(item.id.as_str()),
            )),
            None => Ok(()),
        }
    }
}

impl OrderModel {
    /// Reads the `orders` columns; items are loaded separately.
    pub(crate) fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            total: row.try_get("total")?,
            items: Vec::new(),
        })
    }
}

impl OrderItemModel {
    pub(crate) fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            position: row.try_get("position")?,
        })
    }
}

fn to_u32(value: i64) -> RepositoryResult<u32> {
    u32::try_from(value).map_err(RepositoryError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        let items = vec![
            OrderItem::new("oi1", "Item 1", Money::from_units(10), "p1", 2).unwrap(),
            OrderItem::new("oi2", "Item 2", Money::from_units(5), "p2", 1).unwrap(),
        ];
        Order::new("o1", "c1", items).unwrap()
    }

    #[test]
    fn order_model_uses_storage_names() {
        let model = OrderModel::from_entity(&order());

        assert_eq!(model.customer_id, "c1");
        assert_eq!(model.total, 2500);
        assert_eq!(model.items[1].order_id, "o1");
        assert_eq!(model.items[1].product_id, "p2");
        assert_eq!(model.items[1].position, 1);
    }

    #[test]
    fn order_items_are_rebuilt_in_position_order() {
        let mut model = OrderModel::from_entity(&order());
        model.items.reverse();

        let rebuilt = model.into_entity().unwrap();

        assert_eq!(rebuilt, order());
    }

    #[test]
    fn order_without_items_is_invalid() {
        let mut model = OrderModel::from_entity(&order());
        model.items.clear();

        let err = model.into_entity().unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Invalid(domain::ValidationError::ItemsRequired)
        ));
    }

    #[test]
    fn negative_quantity_is_a_storage_error() {
        let mut model = OrderModel::from_entity(&order());
        model.items[0].quantity = -1;

        assert!(matches!(model.into_entity(), Err(RepositoryError::Storage(_))));
    }

    #[test]
    fn item_owned_by_another_order_is_rejected() {
        let model = OrderModel::from_entity(&order());
        let other = OrderModel::from_entity(
            &Order::new(
                "o2",
                "c1",
                vec![OrderItem::new("oi2", "Item 2", Money::from_units(5), "p2", 1).unwrap()],
            )
            .unwrap(),
        );

        let err = model.check_nested(&other).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::AlreadyExists { entity: "OrderItem", ref id } if id == "oi2"
        ));
    }

    #[test]
    fn customer_address_columns_round_trip() {
        let mut customer = Customer::new("c1", "Customer 1").unwrap();
        customer.change_address(Address::new("Street 1", 1, "Zipcode 1", "City 1"));
        customer.activate().unwrap();
        customer.add_reward_points(12.5);

        let model = CustomerModel::from_entity(&customer);
        assert_eq!(model.zipcode.as_deref(), Some("Zipcode 1"));
        assert!(model.active);

        assert_eq!(model.into_entity().unwrap(), customer);
    }

    #[test]
    fn customer_without_address_has_null_columns() {
        let customer = Customer::new("c1", "Customer 1").unwrap();
        let model = CustomerModel::from_entity(&customer);

        assert!(model.street.is_none());
        assert!(model.number.is_none());
        assert!(!model.active);
    }
}
