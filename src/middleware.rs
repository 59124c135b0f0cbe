//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds security headers to all responses.
///
/// - **Cache-Control: no-store** — nonce and token responses must never be
///   cached by intermediaries.
/// - **X-Content-Type-Options: nosniff** — browsers respect the declared
///   Content-Type.
/// - **X-Frame-Options: DENY** — the API is never framed.
/// - **Strict-Transport-Security** — forces HTTPS for 2 years including
///   subdomains.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );

    response
}
