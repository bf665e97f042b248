use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{Entity, Repository, RepositoryError, RepositoryResult};
use tokio::sync::RwLock;

use crate::models::{CustomerModel, OrderModel, ProductModel, StorageModel};
use crate::{not_found, record_operation};

/// In-memory repository for testing and embedding without a database.
///
/// Stores the same models as the PostgreSQL adapter, keyed by primary key,
/// so both adapters share one mapping. Each write holds the table lock for
/// its whole duration, which makes `update` atomic.
pub struct InMemoryRepository<M: StorageModel> {
    rows: Arc<RwLock<BTreeMap<String, M>>>,
}

/// In-memory `Order` repository.
pub type InMemoryOrderRepository = InMemoryRepository<OrderModel>;

/// In-memory `Customer` repository.
pub type InMemoryCustomerRepository = InMemoryRepository<CustomerModel>;

/// In-memory `Product` repository.
pub type InMemoryProductRepository = InMemoryRepository<ProductModel>;

impl<M: StorageModel> InMemoryRepository<M> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Returns the number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Removes every stored row.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}

/// Rejects `model` if another row already owns one of its nested rows.
fn check_nested<M: StorageModel>(rows: &BTreeMap<String, M>, model: &M) -> RepositoryResult<()> {
    rows.values()
        .filter(|row| row.key() != model.key())
        .try_for_each(|row| model.check_nested(row))
}

impl<M: StorageModel> Default for InMemoryRepository<M> {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same table.
impl<M: StorageModel> Clone for InMemoryRepository<M> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

#[async_trait]
impl<M: StorageModel> Repository<M::Entity> for InMemoryRepository<M> {
    async fn create(&self, entity: &M::Entity) -> RepositoryResult<()> {
        record_operation(M::Entity::entity_type(), "create");
        let model = M::from_entity(entity);

        let mut rows = self.rows.write().await;
        if rows.contains_key(model.key()) {
            return Err(RepositoryError::already_exists::<M::Entity>(entity.id()));
        }
        check_nested(&rows, &model)?;
        rows.insert(model.key().to_string(), model);
        Ok(())
    }

    async fn update(&self, entity: &M::Entity) -> RepositoryResult<()> {
        record_operation(M::Entity::entity_type(), "update");
        let model = M::from_entity(entity);

        let mut rows = self.rows.write().await;
        if !rows.contains_key(model.key()) {
            return Err(not_found::<M::Entity>(entity.id()));
        }
        check_nested(&rows, &model)?;
        rows.insert(model.key().to_string(), model);
        Ok(())
    }

    async fn find(&self, id: &<M::Entity as Entity>::Id) -> RepositoryResult<M::Entity> {
        record_operation(M::Entity::entity_type(), "find");
        let model = self.rows.read().await.get(&id.to_string()).cloned();

        match model {
            Some(model) => model.into_entity(),
            None => Err(not_found::<M::Entity>(id)),
        }
    }

    async fn find_all(&self) -> RepositoryResult<Vec<M::Entity>> {
        record_operation(M::Entity::entity_type(), "find_all");
        let models: Vec<M> = self.rows.read().await.values().cloned().collect();
        models.into_iter().map(StorageModel::into_entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Address, Customer, Money, Order, OrderId, OrderItem, Product, ProductId};

    fn item(id: &str, quantity: u32) -> OrderItem {
        OrderItem::new(id, format!("Item {id}"), Money::from_units(10), "p1", quantity).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_order() {
        let repo = InMemoryOrderRepository::new();
        let order = Order::new("o1", "c1", vec![item("oi1", 2)]).unwrap();

        repo.create(&order).await.unwrap();

        let found = repo.find(&OrderId::new("o1")).await.unwrap();
        assert_eq!(found, order);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let repo = InMemoryOrderRepository::new();
        let order = Order::new("o1", "c1", vec![item("oi1", 1)]).unwrap();

        repo.create(&order).await.unwrap();
        let result = repo.create(&order).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { entity: "Order", .. })
        ));
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();

        let err = repo.find(&ProductId::new("missing")).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryCustomerRepository::new();
        let customer = Customer::new("c1", "Customer 1").unwrap();

        let err = repo.update(&customer).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_replaces_items() {
        let repo = InMemoryOrderRepository::new();
        let mut order = Order::new("o1", "c1", vec![item("oi1", 1), item("oi2", 1)]).unwrap();
        repo.create(&order).await.unwrap();

        let mut kept = item("oi1", 1);
        kept.change_quantity(3);
        order.change_items(vec![kept]).unwrap();
        repo.update(&order).await.unwrap();

        let found = repo.find(order.id()).await.unwrap();
        assert_eq!(found.item_count(), 1);
        assert_eq!(found.total(), Money::from_units(30));
    }

    #[tokio::test]
    async fn test_item_ids_belong_to_one_order() {
        let repo = InMemoryOrderRepository::new();
        let first = Order::new("oA", "c1", vec![item("shared", 1)]).unwrap();
        repo.create(&first).await.unwrap();

        let err = repo
            .create(&Order::new("oB", "c1", vec![item("shared", 2)]).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::AlreadyExists { entity: "OrderItem", .. }
        ));

        let mut second = Order::new("oB", "c1", vec![item("own", 1)]).unwrap();
        repo.create(&second).await.unwrap();
        second.change_items(vec![item("shared", 3)]).unwrap();
        let err = repo.update(&second).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::AlreadyExists { entity: "OrderItem", .. }
        ));

        assert_eq!(repo.find(first.id()).await.unwrap(), first);
        assert_eq!(repo.find(second.id()).await.unwrap().items()[0].id().as_str(), "own");
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_id() {
        let repo = InMemoryProductRepository::new();
        for id in ["p2", "p1", "p3"] {
            let product = Product::new(id, format!("Product {id}"), Money::from_units(1)).unwrap();
            repo.create(&product).await.unwrap();
        }

        let ids: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id().to_string())
            .collect();

        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryCustomerRepository::new();
        let clone = repo.clone();

        let mut customer = Customer::new("c1", "Customer 1").unwrap();
        customer.change_address(Address::new("Street 1", 1, "Zipcode 1", "City 1"));
        repo.create(&customer).await.unwrap();

        assert_eq!(clone.find(customer.id()).await.unwrap(), customer);

        clone.clear().await;
        assert!(repo.is_empty().await);
    }
}
