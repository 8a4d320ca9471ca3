//! Security-related response headers for browser clients.
//!
//! Applied at the Router level. Headers already set by a handler are kept.

use axum::Router;
use axum::http::header::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

const SECURITY_HEADERS: [(&str, &str); 5] = [
    // Clickjacking protection (legacy + modern)
    ("x-frame-options", "DENY"),
    ("content-security-policy", "frame-ancestors 'none'"),
    // Prevent MIME sniffing
    ("x-content-type-options", "nosniff"),
    // Identity data must not leak through referrers
    ("referrer-policy", "no-referrer"),
    ("permissions-policy", "camera=(), microphone=(), geolocation=()"),
];

/// Apply common security headers to all responses.
pub fn apply(router: Router) -> Router {
    SECURITY_HEADERS
        .iter()
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn sets_every_security_header() {
        let app = apply(Router::new().route("/", get(|| async { "ok" })));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        for (name, value) in SECURITY_HEADERS {
            assert_eq!(response.headers()[name], value, "{name}");
        }
    }

    #[tokio::test]
    async fn keeps_handler_provided_value() {
        let app = apply(Router::new().route(
            "/",
            get(|| async { ([("referrer-policy", "same-origin")], "ok") }),
        ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["referrer-policy"], "same-origin");
    }
}
