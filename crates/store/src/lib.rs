//! Document store for the shop backend.
//!
//! Records (users, products, carts, orders) are persisted as whole
//! documents; the store guarantees atomicity per document only. The one
//! richer operation is the conditional stock decrement, which is the
//! authoritative gate against oversell.

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{Money, OrderId, ProductId, UserId};
pub use document::{Cart, CartItem, Order, OrderLine, OrderStatus, PaymentStatus, Product, User};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::DocumentStore;
