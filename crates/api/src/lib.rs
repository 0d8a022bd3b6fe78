//! HTTP API server with observability for the shop backend.
//!
//! Provides REST endpoints for registration, login, the product
//! catalog, carts and order placement, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use auth::TokenIssuer;
use axum::Router;
use axum::routing::{delete, get, post};
use domain::{AccountService, CartService, CheckoutService};
use metrics_exporter_prometheus::PrometheusHandle;
use store::DocumentStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub store: S,
    pub accounts: AccountService<S>,
    pub carts: CartService<S>,
    pub checkout: CheckoutService<S>,
    pub tokens: TokenIssuer,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/register", post(routes::account::register::<S>))
        .route("/login", post(routes::account::login::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/seed-products", post(routes::products::seed::<S>))
        .route("/cart", post(routes::cart::add::<S>))
        .route("/cart", get(routes::cart::get::<S>))
        .route("/cart/{product_id}", delete(routes::cart::remove::<S>))
        .route("/orders", post(routes::orders::place::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the given store.
pub fn create_default_state<S: DocumentStore + Clone + 'static>(
    store: S,
    config: &Config,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        accounts: AccountService::new(store.clone()),
        carts: CartService::new(store.clone()),
        checkout: CheckoutService::new(store.clone()),
        tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs),
        store,
    })
}
