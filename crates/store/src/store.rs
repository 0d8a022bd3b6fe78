use async_trait::async_trait;

use crate::{Cart, Order, Product, ProductId, Result, User, UserId};

/// Core trait for document store implementations.
///
/// Every method is atomic over a single document. There is no
/// cross-document transaction: multi-record workflows (checkout) must
/// sequence these calls and compensate on failure. All implementations
/// must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // -- Users --

    /// Inserts a new user.
    ///
    /// Fails with `StoreError::DuplicateKey` if the email is already
    /// registered.
    async fn insert_user(&self, user: User) -> Result<()>;

    /// Looks up a user by ID.
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Looks up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // -- Products --

    /// Inserts a new product.
    ///
    /// Fails with `StoreError::DuplicateKey` if the product ID already
    /// exists.
    async fn insert_product(&self, product: Product) -> Result<()>;

    /// Returns all products in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Looks up a product by ID.
    async fn find_product(&self, product_id: &ProductId) -> Result<Option<Product>>;

    /// Atomically decrements a product's stock by `quantity`, but only
    /// if the result stays non-negative.
    ///
    /// Returns true on success. Returns false — with no mutation — if
    /// the product does not exist or has insufficient stock. This is
    /// the authoritative gate against oversell; any prior stock check
    /// is an optimistic pre-filter.
    async fn decrement_stock(&self, product_id: &ProductId, quantity: u32) -> Result<bool>;

    /// Atomically increments a product's stock by `quantity`.
    ///
    /// Used to compensate decrements when a later step of a multi-line
    /// checkout fails. Missing products are ignored.
    async fn increment_stock(&self, product_id: &ProductId, quantity: u32) -> Result<()>;

    // -- Carts --

    /// Returns the cart for a user, if one exists.
    async fn get_cart(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Creates or replaces the cart for `cart.user_id`.
    async fn upsert_cart(&self, cart: &Cart) -> Result<()>;

    /// Deletes the cart for a user. Deleting a missing cart is a no-op.
    async fn delete_cart(&self, user_id: UserId) -> Result<()>;

    // -- Orders --

    /// Persists a placed order.
    async fn insert_order(&self, order: &Order) -> Result<()>;

    /// Returns all orders placed by a user, oldest first.
    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;
}
