//! Bearer token authentication extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use store::{DocumentStore, User};

use crate::AppState;
use crate::error::ApiError;

/// The authenticated user behind a `Authorization: Bearer <token>`
/// header.
///
/// Rejects with 401 when the header is missing or malformed, the token
/// fails validation (bad signature, expired), or the token's subject
/// no longer resolves to a stored user.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<Arc<AppState<S>>> for CurrentUser
where
    S: DocumentStore + Clone + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let user_id = state
            .tokens
            .validate(token)
            .map_err(|_| ApiError::Unauthorized)?;

        let user = state
            .store
            .find_user(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}
