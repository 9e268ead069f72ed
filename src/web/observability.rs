//! Request tracing, HTTP metrics and response hardening.
//!
//! The span and summary event hook into `tower_http::trace::TraceLayer`; the
//! login gate fills in `user_id` on the span once the session is resolved.

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::Span;

const UNMATCHED_ROUTE: &str = "unmatched";

const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "same-origin"),
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; style-src 'self'; form-action 'self'; frame-ancestors 'none'; base-uri 'self'",
    ),
];

fn route_of(req: &Request) -> &str {
    req.extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
}

/// `make_span_with` hook: one span per request, keyed by a fresh request id.
pub fn request_span(req: &Request) -> Span {
    tracing::info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %req.method(),
        path = req.uri().path(),
        route = route_of(req),
        user_id = tracing::field::Empty,
    )
}

/// `on_response` hook: the single summary event for a request.
pub fn log_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    tracing::info!(
        status = status.as_u16(),
        latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
        redirect = status.is_redirection(),
        "Request finished"
    );
}

/// Counts requests and records their duration, labelled by route template.
pub async fn record_metrics(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = route_of(&req).to_owned();

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("path", route),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());

    response
}

pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_unrouted_request_uses_fixed_label() {
        let req = Request::builder()
            .uri("/no/such/page/42")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_of(&req), UNMATCHED_ROUTE);
    }

    #[test]
    fn test_security_header_values_are_valid() {
        for (name, value) in SECURITY_HEADERS {
            assert!(HeaderValue::from_str(value).is_ok(), "{name}");
        }
    }
}
