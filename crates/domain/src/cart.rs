//! Cart mutation and lookup.

use common::ProductId;
use store::{Cart, DocumentStore, UserId};

use crate::DomainError;

/// Service for per-user carts.
///
/// The availability check on add is a point-in-time check against
/// current stock; nothing is reserved, so stock may still change
/// before checkout.
pub struct CartService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CartService<S> {
    /// Creates a new cart service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a quantity of a product to the user's cart, creating the
    /// cart if it does not exist and merging lines for the same
    /// product.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }

        let product = self
            .store
            .find_product(&product_id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(product_id.clone()))?;

        if product.stock < quantity {
            return Err(DomainError::InsufficientStock(product_id));
        }

        let mut cart = self
            .store
            .get_cart(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id));
        cart.add_item(product_id, quantity);
        self.store.upsert_cart(&cart).await?;

        Ok(cart)
    }

    /// Removes a product's line from the user's cart if present.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<Cart, DomainError> {
        let mut cart = self
            .store
            .get_cart(user_id)
            .await?
            .ok_or(DomainError::CartNotFound)?;

        cart.remove_item(product_id);
        self.store.upsert_cart(&cart).await?;

        Ok(cart)
    }

    /// Returns the user's cart, or an empty cart if none exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, DomainError> {
        Ok(self
            .store
            .get_cart(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id)))
    }
}
