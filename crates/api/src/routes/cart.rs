//! Cart endpoints (all bearer-authenticated).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use store::{Cart, DocumentStore};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::CurrentUser;

// -- Request types --

#[derive(Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            items: cart
                .items
                .into_iter()
                .map(|i| CartItemResponse {
                    product_id: i.product_id.to_string(),
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /cart — add a product to the caller's cart.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.0.id))]
pub async fn add<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .carts
        .add_item(user.0.id, req.product_id.into(), req.quantity)
        .await?;

    Ok(Json(cart.into()))
}

/// GET /cart — the caller's cart, empty items if none exists.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.carts.get_cart(user.0.id).await?;
    Ok(Json(cart.into()))
}

/// DELETE /cart/{product_id} — remove a product's line from the
/// caller's cart.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .carts
        .remove_item(user.0.id, &product_id.into())
        .await?;

    Ok(Json(cart.into()))
}
