//! Order placement endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use store::{DocumentStore, Order};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::CurrentUser;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub lines: Vec<OrderLineResponse>,
    pub total_cents: i64,
    pub shipping_address: String,
    pub payment_status: String,
    pub order_status: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    product_id: l.product_id.to_string(),
                    quantity: l.quantity,
                    price_cents: l.price.cents(),
                })
                .collect(),
            total_cents: order.total_price.cents(),
            shipping_address: order.shipping_address,
            payment_status: order.payment_status.to_string(),
            order_status: order.order_status.to_string(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    pub order: OrderResponse,
}

// -- Handlers --

/// POST /orders — convert the caller's cart into an order.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.0.id))]
pub async fn place<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    let order = state
        .checkout
        .place_order(user.0.id, &req.shipping_address)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully",
            order: order.into(),
        }),
    ))
}
