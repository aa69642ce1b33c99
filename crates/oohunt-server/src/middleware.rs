use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is echoed back as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id stored as a request extension and echoed in every envelope.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses the caller's `x-request-id` when it is short printable ASCII,
    /// otherwise mints a `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| {
                !v.is_empty()
                    && v.len() <= MAX_REQUEST_ID_LEN
                    && v.bytes().all(|b| b.is_ascii_graphic())
            });

        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter with one window per route group (`products`,
/// `categories`, `cms`, ...), so a burst on one surface does not starve the
/// others.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    groups: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            groups: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request against `group`. When the group is already at its
    /// limit, returns the time left until its window resets.
    async fn acquire(&self, group: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut groups = self.groups.lock().await;
        let window = groups.entry(group.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }

        if window.count >= self.max_requests {
            return Err(self
                .window
                .saturating_sub(now.duration_since(window.started_at)));
        }

        window.count += 1;
        Ok(())
    }
}

/// First path segment after `/api/v1/`, e.g. `products` for
/// `/api/v1/products/featured`.
fn route_group(path: &str) -> &str {
    path.strip_prefix("/api/v1/")
        .and_then(|rest| rest.split('/').next())
        .filter(|group| !group.is_empty())
        .unwrap_or("other")
}

/// Attaches a [`RequestId`] to the request and echoes it in the
/// `x-request-id` response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let echoed = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(value) = echoed {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects requests over the per-group window with a 429 `rate_limited`
/// envelope and a `retry-after` header.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let group = route_group(req.uri().path()).to_string();

    let Err(retry_after) = limiter.acquire(&group).await else {
        return next.run(req).await;
    };

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    tracing::warn!(request_id = %request_id, group = %group, "rate limit exceeded");

    let mut res = ApiError::new(
        request_id,
        "rate_limited",
        format!("too many {group} requests, retry later"),
    )
    .into_response();
    res.headers_mut().insert(
        header::RETRY_AFTER,
        HeaderValue::from(retry_after.as_secs().max(1)),
    );
    res
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Extension, Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn echo_id(Extension(req_id): Extension<RequestId>) -> String {
        req_id.0
    }

    fn app(limiter: RateLimitState) -> Router {
        Router::new()
            .route("/api/v1/products", get(echo_id))
            .route("/api/v1/categories", get(echo_id))
            .layer(axum::middleware::from_fn_with_state(
                limiter,
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn(request_id))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[test]
    fn route_group_is_first_segment_after_prefix() {
        assert_eq!(route_group("/api/v1/products/featured"), "products");
        assert_eq!(route_group("/api/v1/cms/content/about"), "cms");
        assert_eq!(route_group("/api/v1/categories"), "categories");
        assert_eq!(route_group("/health"), "other");
    }

    #[tokio::test]
    async fn request_id_is_propagated_from_header() {
        let response = app(RateLimitState::new(10, Duration::from_secs(60)))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn oversized_request_id_is_replaced() {
        let response = app(RateLimitState::new(10, Duration::from_secs(60)))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .header(REQUEST_ID_HEADER, "x".repeat(MAX_REQUEST_ID_LEN + 1))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("x-request-id header");
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn request_id_is_generated_when_missing() {
        let response = app(RateLimitState::new(10, Duration::from_secs(60)))
            .oneshot(get_request("/api/v1/products"))
            .await
            .expect("response");

        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("x-request-id header");
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn rate_limit_rejects_with_api_envelope() {
        let router = app(RateLimitState::new(1, Duration::from_secs(60)));

        let first = router
            .clone()
            .oneshot(get_request("/api/v1/products"))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);

        let second = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .header(REQUEST_ID_HEADER, "req-limited")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().get(header::RETRY_AFTER).is_some());

        let body = to_bytes(second.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["meta"]["request_id"], "req-limited");
    }

    #[tokio::test]
    async fn route_groups_have_separate_windows() {
        let router = app(RateLimitState::new(1, Duration::from_secs(60)));

        let products = router
            .clone()
            .oneshot(get_request("/api/v1/products"))
            .await
            .expect("response");
        assert_eq!(products.status(), StatusCode::OK);

        let categories = router
            .clone()
            .oneshot(get_request("/api/v1/categories"))
            .await
            .expect("response");
        assert_eq!(categories.status(), StatusCode::OK);

        let products_again = router
            .oneshot(get_request("/api/v1/products"))
            .await
            .expect("response");
        assert_eq!(products_again.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
