//! Business services for the shop backend.
//!
//! This crate provides:
//! - `AccountService` for registration and credential checks
//! - `CartService` for cart mutation and lookup
//! - `CheckoutService` for the order-placement workflow, the one part
//!   of the system with multi-step invariants
//! - the `Email` value object and the `DomainError` taxonomy

pub mod account;
pub mod cart;
pub mod checkout;
pub mod email;
pub mod error;

pub use account::AccountService;
pub use cart::CartService;
pub use checkout::CheckoutService;
pub use email::{Email, EmailError};
pub use error::DomainError;
