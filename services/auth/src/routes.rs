//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use common::{error::CoreError, middleware::rest_layers};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    AppState,
    models::{LoginRequest, RegisterRequest},
    password,
    validation::{validate_password, validate_username},
};

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response for user registration
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .with_state(state);

    rest_layers(router)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;

    validate_username(&payload.username).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;

    info!("Registration attempt for user: {}", payload.username);

    // Hash before touching the store so the slow hash holds no lock
    let password_hash = password::hash_password(payload.password)
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::InternalServerError
        })?;

    let user = state
        .user_repository
        .create(&payload.username, &password_hash)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created successfully".to_string(),
            username: user.username,
        }),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;

    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AuthError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    // No registered account can have such a name
    if validate_username(&payload.username).is_err() {
        warn!("Login rejected for malformed username");
        return Err(AuthError::Unauthorized);
    }

    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.is_allowed(&payload.username).await {
        return Err(AuthError::TooManyRequests);
    }

    // Unknown user and wrong password must look identical to the client,
    // in timing as well as in the response
    let user = match state.user_repository.get(&payload.username).await {
        Ok(user) => user,
        Err(CoreError::NotFound) => {
            if let Err(e) = password::verify_dummy(payload.password).await {
                error!("Failed to run dummy verification: {}", e);
            }
            warn!("Login failed for user: {}", payload.username);
            return Err(AuthError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    let valid = password::verify_password(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;

    if !valid {
        warn!("Login failed for user: {}", user.username);
        return Err(AuthError::Unauthorized);
    }

    state.rate_limiter.reset(&user.username).await;

    let token = state.token_service.issue(&user.username)?;

    let response = TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.ttl_seconds(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    BadRequest(String),
    Unauthorized,
    Conflict,
    TooManyRequests,
    InternalServerError,
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Conflict => AuthError::Conflict,
            CoreError::NotFound | CoreError::InvalidToken | CoreError::ExpiredToken => {
                AuthError::Unauthorized
            }
            CoreError::Unavailable(detail) => {
                error!("Backend unavailable: {}", detail);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            AuthError::Conflict => (StatusCode::CONFLICT, "username already exists".to_string()),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "too many login attempts, try again later".to_string(),
            ),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
