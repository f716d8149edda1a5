//! Rate limiting middleware backed by Redis.
//!
//! Fails closed: when the counter store errors the request is rejected.
//! When no rate limiter is configured every request passes.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        let body = json!({
            "success": false,
            "error": {
                "code": "RATE_LIMITED",
                "message": "Too many requests. Please try again later."
            }
        });

        (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
    }
}

/// Extract client identifier for rate limiting.
///
/// `X-Forwarded-For` and `X-Real-IP` are client-controlled unless a proxy
/// rewrites them, so they are only read when `trust_proxy_headers` is set.
/// Otherwise the connection's peer address is used.
fn get_client_identifier(request: &Request, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_client(request) {
            return ip;
        }
    }

    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(connect_info) => connect_info.0.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// First `X-Forwarded-For` hop, else `X-Real-IP`
fn forwarded_client(request: &Request) -> Option<String> {
    header_str(request, "X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next())
        .or_else(|| header_str(request, "X-Real-IP"))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn header_str<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|h| h.to_str().ok())
}

async fn enforce(
    state: AppState,
    group: &str,
    max_requests: u64,
    window_seconds: u64,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return Ok(next.run(request).await);
    };

    let client_id = get_client_identifier(&request, limiter.trusts_proxy_headers());
    let key = format!("{}:{}", group, client_id);

    let decision = match limiter.check(&key, max_requests, window_seconds).await {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(error = %e, group, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: window_seconds,
            });
        }
    };

    if !decision.allowed {
        tracing::warn!(client = %client_id, group, count = decision.count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: window_seconds,
        });
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(max_requests));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining()));

    Ok(response)
}

/// General rate limiting for protected routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        state,
        "general",
        RATE_LIMIT_REQUESTS,
        RATE_LIMIT_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}

/// Stricter rate limiting for authentication endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        state,
        "auth",
        RATE_LIMIT_AUTH_REQUESTS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}
