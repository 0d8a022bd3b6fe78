//! Registration and login endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use store::DocumentStore;

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Handlers --

/// POST /register — create a new user account.
#[tracing::instrument(skip(state, req))]
pub async fn register<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .accounts
        .register(&req.full_name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

/// POST /login — exchange credentials for a bearer token.
#[tracing::instrument(skip(state, req))]
pub async fn login<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.accounts.authenticate(&req.email, &req.password).await?;

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse { token }))
}
