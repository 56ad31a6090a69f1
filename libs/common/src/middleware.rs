//! HTTP layers shared by every service
//!
//! These sit between the client and the handlers and never look at the
//! resource being served: request tracing, cache headers and rejection of
//! session cookies.

use axum::{
    Json, Router,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::{Next, from_fn},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Response header carrying the per-request identifier
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Wrap a router with request tracing, cookie rejection and cache headers
pub fn rest_layers(router: Router) -> Router {
    router
        .layer(from_fn(cache_control))
        .layer(from_fn(no_session_state))
        .layer(from_fn(request_id))
}

/// Tag every response with `X-Request-ID` and log one line per request
pub async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        request_id = %id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

/// Safe reads may be cached for a minute; everything else must not be stored
pub async fn cache_control(req: Request, next: Next) -> Response {
    let cacheable = matches!(*req.method(), Method::GET | Method::HEAD);
    let mut response = next.run(req).await;

    let value = if cacheable {
        HeaderValue::from_static("public, max-age=60")
    } else {
        HeaderValue::from_static("no-store")
    };
    response.headers_mut().insert(header::CACHE_CONTROL, value);

    response
}

/// Reject requests that carry a session cookie
pub async fn no_session_state(req: Request, next: Next) -> Response {
    if req.headers().contains_key(header::COOKIE) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "session cookies are not supported; the API is stateless",
            })),
        )
            .into_response();
    }

    next.run(req).await
}
