//! Shared-secret authentication for inbound requests.

use lambda_http::http::HeaderMap;
use thiserror::Error;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Why a request was rejected. Both causes get the same response body.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("x-api-key header is missing")]
    MissingKey,
    #[error("x-api-key is not correct")]
    InvalidKey,
}

/// Check the `x-api-key` header against the configured key.
///
/// Comparison is exact and case-sensitive. A header value that is not valid
/// visible ASCII can never match and counts as an invalid key.
pub fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let value = headers.get(API_KEY_HEADER).ok_or(AuthError::MissingKey)?;

    // An empty header is treated the same as no header at all.
    if value.is_empty() {
        return Err(AuthError::MissingKey);
    }

    match value.to_str() {
        Ok(key) if key == expected => Ok(()),
        _ => Err(AuthError::InvalidKey),
    }
}
