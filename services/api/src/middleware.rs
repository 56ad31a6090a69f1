//! Authentication middleware for JWT token validation

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Authentication middleware
///
/// A missing header and a bad token are both 401; a header that is present
/// but not `Bearer <token>` is a malformed request and gets 400.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    let TypedHeader(authorization) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state)
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    ApiError::Unauthorized("authorization header required")
                } else {
                    ApiError::BadRequest(
                        "authorization header format must be 'Bearer {token}'".to_string(),
                    )
                }
            })?;

    let username = state
        .token_service
        .validate(authorization.token())
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            ApiError::Unauthorized("invalid or expired token")
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser { username });

    Ok(next.run(req).await)
}
