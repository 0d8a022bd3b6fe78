//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Money;
use serde::Serialize;
use store::{DocumentStore, Product, StoreError};

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductResponse {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            product_id: p.product_id.to_string(),
            name: p.name,
            price_cents: p.price.cents(),
            stock: p.stock,
        }
    }
}

/// GET /products — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.store.list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// The demo catalog inserted by the seed endpoint.
fn demo_products() -> Vec<Product> {
    vec![Product::new(
        "prod1",
        "Test Product",
        Money::from_cents(1000),
        100,
    )]
}

/// POST /seed-products — insert the demo catalog, tolerating
/// duplicates so the endpoint stays idempotent.
#[tracing::instrument(skip(state))]
pub async fn seed<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    for product in demo_products() {
        match state.store.insert_product(product).await {
            Ok(()) | Err(StoreError::DuplicateKey { .. }) => {}
            Err(e) => return Err(ApiError::from(e)),
        }
    }

    Ok(Json(serde_json::json!({ "message": "Products seeded" })))
}
