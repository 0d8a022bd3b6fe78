//! Identity provider for the shop backend.
//!
//! Two independent concerns live here: password hashing/policy for
//! registration and login, and signed bearer tokens for protected
//! requests. Token validation is a pure function of the token string
//! and the signing key; there is no session state.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenIssuer};
