pub mod account;
pub mod cart;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
