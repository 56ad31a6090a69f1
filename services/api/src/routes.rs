//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use common::middleware::rest_layers;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{ItemRequest, ItemsResponse},
    state::AppState,
    validation::validate_item,
};

/// Create the router for the API service
///
/// Reads are public; every mutation goes through `auth_middleware`.
pub fn create_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/items",
            get(list_items).merge(post(create_item).route_layer(auth.clone())),
        )
        .route(
            "/items/:id",
            get(get_item).merge(put(update_item).delete(delete_item).route_layer(auth)),
        )
        .with_state(state);

    rest_layers(router)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

fn set_last_modified(response: &mut Response, at: DateTime<Utc>) {
    let formatted = at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    if let Ok(value) = HeaderValue::from_str(&formatted) {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }
}

fn parse_payload(payload: Result<Json<ItemRequest>, JsonRejection>) -> ApiResult<ItemRequest> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_item(&payload).map_err(ApiError::BadRequest)?;
    Ok(payload)
}

/// List all items, most recently updated first
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Response> {
    let items = state.item_repository.list().await?;
    let newest = items.iter().map(|item| item.updated_at).max();

    let mut response = Json(ItemsResponse { data: items }).into_response();
    if let Some(newest) = newest {
        set_last_modified(&mut response, newest);
    }

    Ok(response)
}

/// Get an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let item = state.item_repository.get(&id).await?;
    let updated_at = item.updated_at;

    let mut response = Json(item).into_response();
    set_last_modified(&mut response, updated_at);

    Ok(response)
}

/// Create a new item
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = parse_payload(payload)?;

    let item = state
        .item_repository
        .create(&payload.name, &payload.description)
        .await?;

    info!("User {} created item {}", user.username, item.id);

    let mut response = (StatusCode::CREATED, Json(&item)).into_response();
    if let Ok(location) = HeaderValue::from_str(&format!("/items/{}", item.id)) {
        response.headers_mut().insert(header::LOCATION, location);
    }

    Ok(response)
}

/// Replace an existing item
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = parse_payload(payload)?;

    let item = state
        .item_repository
        .update(&id, &payload.name, &payload.description)
        .await?;

    info!("User {} updated item {}", user.username, item.id);

    Ok(Json(item))
}

/// Delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.item_repository.delete(&id).await?;

    info!("User {} deleted item {}", user.username, id);

    Ok(StatusCode::NO_CONTENT)
}
