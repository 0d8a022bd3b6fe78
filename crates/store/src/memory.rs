use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::{
    Cart, Order, Product, ProductId, Result, StoreError, User, UserId, store::DocumentStore,
};

/// In-memory document store implementation.
///
/// Backs the default server mode and the test suites. Provides the
/// same interface and atomicity guarantees as the PostgreSQL
/// implementation: each method takes a single write lock, so every
/// operation is atomic over the documents it touches.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey {
                collection: "users",
                key: user.email,
            });
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.product_id) {
            return Err(StoreError::DuplicateKey {
                collection: "products",
                key: product.product_id.to_string(),
            });
        }
        products.insert(product.product_id.clone(), product);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut all: Vec<_> = products.values().cloned().collect();
        all.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        Ok(all)
    }

    async fn find_product(&self, product_id: &ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(product_id).cloned())
    }

    async fn decrement_stock(&self, product_id: &ProductId, quantity: u32) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(product_id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn increment_stock(&self, product_id: &ProductId, quantity: u32) -> Result<()> {
        let mut products = self.products.write().await;
        if let Some(product) = products.get_mut(product_id) {
            product.stock += quantity;
        }
        Ok(())
    }

    async fn get_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn upsert_cart(&self, cart: &Cart) -> Result<()> {
        self.carts.write().await.insert(cart.user_id, cart.clone());
        Ok(())
    }

    async fn delete_cart(&self, user_id: UserId) -> Result<()> {
        self.carts.write().await.remove(&user_id);
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use crate::OrderLine;

    #[tokio::test]
    async fn insert_user_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        store
            .insert_user(User::new("Ada", "ada@example.com", "hash1"))
            .await
            .unwrap();

        let result = store
            .insert_user(User::new("Other Ada", "ada@example.com", "hash2"))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));

        // The first user is unaffected.
        let user = store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.full_name, "Ada");
    }

    #[tokio::test]
    async fn find_user_by_id_and_email() {
        let store = InMemoryStore::new();
        let user = User::new("Ada", "ada@example.com", "hash");
        let id = user.id;
        store.insert_user(user).await.unwrap();

        assert!(store.find_user(id).await.unwrap().is_some());
        assert!(store.find_user(UserId::new()).await.unwrap().is_none());
        assert!(
            store
                .find_user_by_email("nobody@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn insert_product_rejects_duplicate_id() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 10))
            .await
            .unwrap();

        let result = store
            .insert_product(Product::new("prod1", "Widget again", Money::from_cents(1), 1))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn list_products_is_sorted_by_id() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod2", "B", Money::from_cents(1), 1))
            .await
            .unwrap();
        store
            .insert_product(Product::new("prod1", "A", Money::from_cents(1), 1))
            .await
            .unwrap();

        let products = store.list_products().await.unwrap();
        assert_eq!(products[0].product_id.as_str(), "prod1");
        assert_eq!(products[1].product_id.as_str(), "prod2");
    }

    #[tokio::test]
    async fn decrement_stock_succeeds_within_bounds() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 100))
            .await
            .unwrap();

        assert!(store.decrement_stock(&"prod1".into(), 2).await.unwrap());

        let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
        assert_eq!(product.stock, 98);
    }

    #[tokio::test]
    async fn decrement_stock_refuses_to_go_negative() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 100))
            .await
            .unwrap();

        assert!(!store.decrement_stock(&"prod1".into(), 200).await.unwrap());

        // No mutation on refusal.
        let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
        assert_eq!(product.stock, 100);
    }

    #[tokio::test]
    async fn decrement_stock_to_exactly_zero() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 5))
            .await
            .unwrap();

        assert!(store.decrement_stock(&"prod1".into(), 5).await.unwrap());
        let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn decrement_stock_missing_product() {
        let store = InMemoryStore::new();
        assert!(!store.decrement_stock(&"ghost".into(), 1).await.unwrap());
    }

    #[tokio::test]
    async fn increment_stock_compensates() {
        let store = InMemoryStore::new();
        store
            .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 10))
            .await
            .unwrap();

        store.decrement_stock(&"prod1".into(), 4).await.unwrap();
        store.increment_stock(&"prod1".into(), 4).await.unwrap();

        let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn cart_upsert_get_delete() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();

        assert!(store.get_cart(user_id).await.unwrap().is_none());

        let mut cart = Cart::empty(user_id);
        cart.add_item("prod1".into(), 2);
        store.upsert_cart(&cart).await.unwrap();

        let loaded = store.get_cart(user_id).await.unwrap().unwrap();
        assert_eq!(loaded, cart);

        store.delete_cart(user_id).await.unwrap();
        assert!(store.get_cart(user_id).await.unwrap().is_none());

        // Deleting again is a no-op.
        store.delete_cart(user_id).await.unwrap();
    }

    #[tokio::test]
    async fn orders_for_user_filters_by_user() {
        let store = InMemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let order = Order::new(
            alice,
            vec![OrderLine::new("prod1", 1, Money::from_cents(1000))],
            "1 Main St",
        );
        store.insert_order(&order).await.unwrap();

        assert_eq!(store.orders_for_user(alice).await.unwrap().len(), 1);
        assert!(store.orders_for_user(bob).await.unwrap().is_empty());
        assert_eq!(store.order_count().await, 1);
    }
}
