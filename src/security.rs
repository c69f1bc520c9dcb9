use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Whether the request carries the expected admin key.
///
/// With no key configured every request is refused.
pub fn is_authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
    match (expected, bearer_token(headers)) {
        (Some(expected), Some(token)) if !expected.is_empty() => {
            constant_time_compare(token, expected)
        }
        _ => false,
    }
}
