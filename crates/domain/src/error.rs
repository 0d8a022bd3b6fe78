//! Domain error taxonomy.

use auth::AuthError;
use common::ProductId;
use store::StoreError;
use thiserror::Error;

use crate::email::EmailError;

/// Errors that can occur during domain operations.
///
/// Every variant except `Store` is a business-rule failure that the
/// API boundary reports as a 400; `Store` is infrastructure and maps
/// to a 500.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The email did not parse.
    #[error("Invalid email format")]
    InvalidEmail(#[from] EmailError),

    /// Another user is already registered with this email.
    #[error("Email already exists")]
    DuplicateEmail,

    /// The email/password pair did not match.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Password policy or hashing failure.
    #[error(transparent)]
    Auth(AuthError),

    /// Cart quantities must be at least 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// Checkout requires a shipping address.
    #[error("Shipping address is required")]
    MissingShippingAddress,

    /// Checkout on an absent or empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The user has no cart to mutate.
    #[error("Cart not found")]
    CartNotFound,

    /// The product does not exist in the catalog.
    #[error("Product {0} not available")]
    ProductNotFound(ProductId),

    /// The product exists but does not have enough stock.
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// An error occurred in the document store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for DomainError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => DomainError::InvalidCredentials,
            other => DomainError::Auth(other),
        }
    }
}
