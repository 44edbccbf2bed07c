use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::env;

/// Security header names
const X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
const X_FRAME_OPTIONS: &str = "X-Frame-Options";
const X_XSS_PROTECTION: &str = "X-XSS-Protection";
const STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
const CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
const REFERRER_POLICY: &str = "Referrer-Policy";
const PERMISSIONS_POLICY: &str = "Permissions-Policy";

/// Security header values
const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const XSS_BLOCK: &str = "1; mode=block";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const PERMISSIONS_POLICY_VALUE: &str = "geolocation=(), microphone=(), camera=()";

fn static_headers() -> [(HeaderName, HeaderValue); 6] {
    [
        (
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static(NOSNIFF),
        ),
        (
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static(DENY),
        ),
        (
            HeaderName::from_static("x-xss-protection"),
            HeaderValue::from_static(XSS_BLOCK),
        ),
        (
            HeaderName::from_static("content-security-policy"),
            HeaderValue::from_static(CSP_API_VALUE),
        ),
        (
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static(REFERRER_POLICY_VALUE),
        ),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
        ),
    ]
}

fn include_hsts() -> bool {
    env::var("RUST_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false)
}

/// Adds the standard API security headers to every response. HSTS is only
/// emitted in production (HTTPS environments).
pub async fn security_headers(request: Request, next: Next) -> Response {
    let hsts = include_hsts();
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in static_headers() {
        headers.insert(name, value);
    }

    if hsts {
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_match_lowercase_constants() {
        // HeaderName::from_static requires lowercase; keep the display
        // constants and the static table in sync.
        for (name, display) in [
            ("x-content-type-options", X_CONTENT_TYPE_OPTIONS),
            ("x-frame-options", X_FRAME_OPTIONS),
            ("x-xss-protection", X_XSS_PROTECTION),
            ("strict-transport-security", STRICT_TRANSPORT_SECURITY),
            ("content-security-policy", CONTENT_SECURITY_POLICY),
            ("referrer-policy", REFERRER_POLICY),
            ("permissions-policy", PERMISSIONS_POLICY),
        ] {
            assert_eq!(name, display.to_lowercase());
        }
    }

    #[test]
    fn static_header_values_are_valid() {
        assert_eq!(static_headers().len(), 6);
    }

    #[test]
    fn hsts_defaults_off_outside_production() {
        std::env::remove_var("RUST_ENV");
        assert!(!include_hsts());
    }
}
