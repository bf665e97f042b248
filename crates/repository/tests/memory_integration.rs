//! The in-memory adapters used behind the repository port trait objects.

use std::sync::Arc;

use domain::{
    Customer, CustomerRepository, Entity, Money, Order, OrderItem, OrderRepository, Repository,
    RepositoryError,
};
use repository::{InMemoryCustomerRepository, InMemoryOrderRepository};

fn item(id: &str, quantity: u32) -> OrderItem {
    OrderItem::new(id, format!("Item {id}"), Money::from_units(10), "p1", quantity).unwrap()
}

#[tokio::test]
async fn order_lifecycle_through_trait_object() {
    let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());

    let mut order = Order::new("o1", "c1", vec![item("oi1", 1), item("oi2", 2)]).unwrap();
    orders.create(&order).await.unwrap();

    order.change_items(vec![item("oi2", 4)]).unwrap();
    orders.update(&order).await.unwrap();

    let found = orders.find(order.id()).await.unwrap();
    assert_eq!(found.item_count(), 1);
    assert_eq!(found.items()[0].id().as_str(), "oi2");
    assert_eq!(found.total(), Money::from_units(40));
}

#[tokio::test]
async fn concurrent_creates_of_the_same_id_store_one_row() {
    let repo = InMemoryCustomerRepository::new();
    let customers: Arc<dyn CustomerRepository> = Arc::new(repo.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let customers = Arc::clone(&customers);
            tokio::spawn(async move {
                let customer = Customer::new("c1", format!("Customer {i}")).unwrap();
                customers.create(&customer).await
            })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => created += 1,
            Err(RepositoryError::AlreadyExists { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, 7);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn found_entities_are_detached_copies() {
    let customers = InMemoryCustomerRepository::new();
    let customer = Customer::new("c1", "Customer 1").unwrap();
    customers.create(&customer).await.unwrap();

    let mut loaded = customers.find(customer.id()).await.unwrap();
    loaded.add_reward_points(10.0);

    // Not persisted until update is called.
    assert_eq!(customers.find(customer.id()).await.unwrap().reward_points(), 0.0);

    customers.update(&loaded).await.unwrap();
    assert_eq!(customers.find(customer.id()).await.unwrap().reward_points(), 10.0);
}
