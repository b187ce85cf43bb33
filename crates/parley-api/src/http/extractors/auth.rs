//! Bearer-token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>`, verifies the JWT, and loads the
//! user it names. Any failure rejects the request with 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user = state.auth_service.authenticate(token).await.map_err(|e| {
            tracing::warn!(error = %e, "Rejected bearer token");
            AppError::from(e)
        })?;

        Ok(AuthUser { id: user.id })
    }
}

/// Extract the token from the `Authorization` header.
fn extract_bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
        AppError::Unauthorized(
            "Missing credentials. Provide 'Authorization: Bearer <token>'.".to_string(),
        )
    })?;

    let value = header.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authorization scheme must be Bearer".to_string()))
}
