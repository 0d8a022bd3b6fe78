//! The order-placement workflow.

use std::time::Instant;

use store::{DocumentStore, Order, OrderLine, UserId};

use crate::DomainError;

/// Service that converts a user's cart into a durable order.
///
/// The store offers per-document atomicity only, so the workflow
/// sequences its writes to keep the system consistent without a
/// cross-document transaction: stock is secured through conditional
/// decrements (compensated on partial failure) before the order record
/// is written, and the cart is deleted last.
pub struct CheckoutService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CheckoutService<S> {
    /// Creates a new checkout service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places an order from the user's cart.
    ///
    /// Steps:
    /// 1. Load the cart; absent or empty fails with `EmptyCart`.
    /// 2. Validate every line against the catalog and snapshot prices.
    ///    No mutation happens until all lines pass.
    /// 3. Decrement stock per line through the store's conditional
    ///    decrement; on failure, re-increment the lines already taken
    ///    and fail with `InsufficientStock` — net-zero mutation.
    /// 4. Persist the order (both statuses Pending), then delete the
    ///    cart.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        shipping_address: &str,
    ) -> Result<Order, DomainError> {
        let start = Instant::now();

        let result = self.place_order_inner(user_id, shipping_address).await;

        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_id = %order.id,
                    total_cents = order.total_price.cents(),
                    lines = order.lines.len(),
                    "order placed"
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total").increment(1);
                tracing::warn!(error = %e, "order rejected");
            }
        }

        result
    }

    async fn place_order_inner(
        &self,
        user_id: UserId,
        shipping_address: &str,
    ) -> Result<Order, DomainError> {
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(DomainError::MissingShippingAddress);
        }

        let cart = self
            .store
            .get_cart(user_id)
            .await?
            .filter(|c| !c.is_empty())
            .ok_or(DomainError::EmptyCart)?;

        // Optimistic pre-filter: validate every line and snapshot the
        // current prices before touching any stock.
        let mut lines = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let product = self
                .store
                .find_product(&item.product_id)
                .await?
                .ok_or_else(|| DomainError::ProductNotFound(item.product_id.clone()))?;

            if product.stock < item.quantity {
                return Err(DomainError::InsufficientStock(item.product_id.clone()));
            }

            lines.push(OrderLine::new(
                item.product_id.clone(),
                item.quantity,
                product.price,
            ));
        }

        // Authoritative gate: conditional decrements, compensated on
        // failure so a concurrent checkout cannot cause oversell or a
        // half-taken cart.
        for (taken, line) in lines.iter().enumerate() {
            let ok = self
                .store
                .decrement_stock(&line.product_id, line.quantity)
                .await?;
            if !ok {
                for done in &lines[..taken] {
                    self.store
                        .increment_stock(&done.product_id, done.quantity)
                        .await?;
                }
                return Err(DomainError::InsufficientStock(line.product_id.clone()));
            }
        }

        let order = Order::new(user_id, lines, shipping_address);
        self.store.insert_order(&order).await?;
        self.store.delete_cart(user_id).await?;

        Ok(order)
    }
}
