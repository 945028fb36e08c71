//! In-memory store for tests and local demos.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crown_shop_core::{Order, OrderId, OrderStatus, Product, ProductId};

use super::{CatalogStore, NewOrder, OrderStore, RepositoryError, Store};

/// A [`Store`] that keeps everything in process memory.
///
/// Order IDs start at 1 and increase by one per order, like a `SERIAL` column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    last_order_id: i32,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `products`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            inner: RwLock::new(Inner {
                products,
                ..Inner::default()
            }),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.inner.read().await.products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut inner = self.inner.write().await;
        let next_id = inner
            .last_order_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Conflict("order id sequence exhausted".to_string()))?;
        inner.last_order_id = next_id;

        let stored = Order {
            id: OrderId::new(next_id),
            customer_name: order.customer_name,
            phone: order.phone,
            address: order.address,
            total_amount: order.total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            items: order.items,
        };
        inner.orders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut inner = self.inner.write().await;
        match inner.orders.get_mut(&id) {
            Some(order) if order.status == from => {
                order.status = to;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crown_shop_core::{OrderLineSnapshot, Price};

    fn product(id: i32, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Item {id}"),
            price: Price::from_cents(cents),
            images: Vec::new(),
            stock: 1,
            category: "crown".to_string(),
        }
    }

    fn new_order(name: &str) -> NewOrder {
        NewOrder {
            customer_name: name.to_string(),
            phone: "1".to_string(),
            address: "X".to_string(),
            total_amount: Price::from_cents(100),
            items: vec![OrderLineSnapshot {
                id: ProductId::new(1),
                title: "Item 1".to_string(),
                unit_price: Price::from_cents(100),
                quantity: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let store = MemoryStore::with_products([product(2, 500), product(1, 100)]);

        let all = store.list_products().await.unwrap();
        assert_eq!(all.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(), [1, 2]);
        assert!(store.get_product(ProductId::new(9)).await.unwrap().is_none());

        let some = store
            .get_products(&[ProductId::new(2), ProductId::new(9)])
            .await
            .unwrap();
        assert_eq!(some.len(), 1);
    }

    #[tokio::test]
    async fn test_orders_are_sequential_and_newest_first() {
        let store = MemoryStore::new();
        let first = store.create_order(new_order("a")).await.unwrap();
        let second = store.create_order(new_order("b")).await.unwrap();

        assert_eq!(first.id, OrderId::new(1));
        assert_eq!(second.id, OrderId::new(2));
        assert_eq!(first.status, OrderStatus::Pending);

        let listed = store.list_orders().await.unwrap();
        assert_eq!(listed.first().unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_compare_and_set_only_from_expected_status() {
        let store = MemoryStore::new();
        let order = store.create_order(new_order("a")).await.unwrap();

        let stale = store
            .compare_and_set_status(order.id, OrderStatus::Paid, OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(stale.is_none());

        let moved = store
            .compare_and_set_status(order.id, OrderStatus::Pending, OrderStatus::Paid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, OrderStatus::Paid);

        let missing = store
            .compare_and_set_status(OrderId::new(99), OrderStatus::Pending, OrderStatus::Paid)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
